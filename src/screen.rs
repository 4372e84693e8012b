use std::io::{self, Write};

use termion::{clear, color, cursor, style};

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::highlight::Highlight;
use crate::{KILO_VERSION, UI_HEIGHT};

/// 1 フレームの描画に必要な状態
pub struct View<'a> {
    pub buffer: &'a Buffer,
    pub cursor: &'a Cursor,
    pub filename: Option<&'a str>,
    /// 期限切れでないステータスメッセージ
    pub message: Option<&'a str>,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

pub struct Screen;

impl Screen {
    pub fn editor_rows(rows: u16) -> usize {
        rows.saturating_sub(UI_HEIGHT) as usize
    }

    /// フレーム全体を 1 つのバイト列に組み立てる
    ///
    /// ちらつきを防ぐため、呼び出し側はこれを 1 回の書き込みで出力する。
    pub fn render(view: &View) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();

        // カーソルを隠して左上へ
        write!(out, "{}{}", cursor::Hide, cursor::Goto(1, 1))?;

        Self::draw_rows(&mut out, view)?;
        Self::draw_status_bar(&mut out, view)?;
        Self::draw_message_bar(&mut out, view)?;

        let c = view.cursor;
        let y = c.cy.saturating_sub(c.row_offset) + 1;
        let x = c.rx.saturating_sub(c.col_offset) + 1;
        write!(out, "{}", cursor::Goto(clamp_u16(x), clamp_u16(y)))?;

        write!(out, "{}", cursor::Show)?;
        Ok(out)
    }

    fn draw_rows(out: &mut impl Write, view: &View) -> io::Result<()> {
        let buffer = view.buffer;

        for y in 0..view.screen_rows {
            let file_row = y + view.cursor.row_offset;

            match buffer.row(file_row) {
                Some(row) => {
                    let start = view.cursor.col_offset.min(row.render_len());
                    let end = (view.cursor.col_offset + view.screen_cols).min(row.render_len());
                    draw_colored(out, &row.render()[start..end], &row.highlight()[start..end])?;
                }
                None if buffer.is_empty()
                    && view.filename.is_none()
                    && y == view.screen_rows / 3 =>
                {
                    draw_welcome(out, view.screen_cols)?;
                }
                None => write!(out, "~")?,
            }

            write!(out, "{}\r\n", clear::UntilNewline)?;
        }
        Ok(())
    }

    fn draw_status_bar(out: &mut impl Write, view: &View) -> io::Result<()> {
        let buffer = view.buffer;
        let cols = view.screen_cols;

        // ステータスバー（反転表示）
        write!(out, "{}", style::Invert)?;

        let name = view.filename.unwrap_or("[No Name]");
        let modified = if buffer.is_dirty() { "(modified)" } else { "" };
        let status = format!("{:.20} - {} lines {}", name, buffer.len(), modified);
        let rstatus = match buffer.syntax() {
            Some(syntax) => format!("{} | {}/{}", syntax.filetype, view.cursor.cy + 1, buffer.len()),
            None => format!("{}/{}", view.cursor.cy + 1, buffer.len()),
        };

        let mut len = status.len().min(cols);
        out.write_all(&status.as_bytes()[..len])?;
        while len < cols {
            // 右端に現在行 / 総行数
            if cols - len == rstatus.len() {
                write!(out, "{}", rstatus)?;
                break;
            }
            write!(out, " ")?;
            len += 1;
        }

        write!(out, "{}\r\n", style::Reset)?;
        Ok(())
    }

    fn draw_message_bar(out: &mut impl Write, view: &View) -> io::Result<()> {
        write!(out, "{}", clear::UntilNewline)?;
        if let Some(message) = view.message {
            let len = message.len().min(view.screen_cols);
            out.write_all(&message.as_bytes()[..len])?;
        }
        Ok(())
    }
}

/// 分類に応じて色を付けながら書き出す
///
/// 色が変わるときだけエスケープシーケンスを出す。
fn draw_colored(out: &mut impl Write, text: &[u8], hl: &[Highlight]) -> io::Result<()> {
    let mut current: Option<u8> = None;

    for (&c, &h) in text.iter().zip(hl) {
        if c.is_ascii_control() {
            // 制御文字は反転表示の記号に置き換え、直後に色を戻す
            let sym = if c <= 26 { b'@' + c } else { b'?' };
            write!(out, "{}", style::Invert)?;
            out.write_all(&[sym])?;
            write!(out, "{}", style::Reset)?;
            if let Some(value) = current {
                write!(out, "{}", color::Fg(color::AnsiValue(value)))?;
            }
        } else if h == Highlight::Normal {
            if current.take().is_some() {
                write!(out, "{}", color::Fg(color::Reset))?;
            }
            out.write_all(&[c])?;
        } else {
            let value = h.color().0;
            if current != Some(value) {
                current = Some(value);
                write!(out, "{}", color::Fg(color::AnsiValue(value)))?;
            }
            out.write_all(&[c])?;
        }
    }

    write!(out, "{}", color::Fg(color::Reset))
}

fn draw_welcome(out: &mut impl Write, cols: usize) -> io::Result<()> {
    let welcome = format!("Kilo editor -- version {KILO_VERSION}");
    let len = welcome.len().min(cols);

    // 中央寄せ
    let mut padding = (cols - len) / 2;
    if padding > 0 {
        write!(out, "~")?;
        padding -= 1;
    }
    write!(out, "{}", " ".repeat(padding))?;
    out.write_all(&welcome.as_bytes()[..len])
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
