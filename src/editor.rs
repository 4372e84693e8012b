use std::io;
use std::time::Instant;

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::file_io::FileIO;
use crate::key::{self, Key};
use crate::screen::{Screen, View};
use crate::search::SearchState;
use crate::syntax::Syntax;
use crate::terminal::TerminalIo;
use crate::{KILO_QUIT_TIMES, STATUS_MESSAGE_TIMEOUT};

pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// キー処理後にループを続けるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// プロンプト入力中、キーごとに呼ばれる
pub trait PromptHandler {
    fn on_key(&mut self, editor: &mut Editor, input: &str, key: Key);
}

struct StatusMessage {
    text: String,
    time: Instant,
}

pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    filename: Option<String>,
    status: Option<StatusMessage>,
    screen_rows: usize,
    screen_cols: usize,
    /// 未保存時の終了に必要な残りの Ctrl-Q 回数
    quit_times: usize,
}

impl Editor {
    /// `size` は端末の (cols, rows)
    pub fn new(size: (u16, u16)) -> Self {
        Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            filename: None,
            status: None,
            screen_rows: Screen::editor_rows(size.1),
            screen_cols: size.0 as usize,
            quit_times: KILO_QUIT_TIMES,
        }
    }

    /// ファイルを開く
    ///
    /// 存在しないパスは空の文書として開き、最初の保存で作成する。
    pub fn open_file(&mut self, filename: String) -> Result<()> {
        let syntax = Syntax::for_filename(&filename);
        let lines = match FileIO::open(&filename) {
            Ok(lines) => lines,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{filename} does not exist, starting a new file");
                self.set_status_message("New file");
                Vec::new()
            }
            Err(source) => {
                return Err(Error::Open {
                    path: filename.into(),
                    source,
                });
            }
        };

        log::info!("opened {filename} ({} lines)", lines.len());
        self.buffer = Buffer::from_lines(lines, syntax);
        self.cursor = Cursor::new();
        self.filename = Some(filename);
        Ok(())
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub(crate) fn buffer_and_cursor_mut(&mut self) -> (&mut Buffer, &mut Cursor) {
        (&mut self.buffer, &mut self.cursor)
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            time: Instant::now(),
        });
    }

    /// 表示期限内のステータスメッセージ
    pub fn status_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| !s.text.is_empty() && s.time.elapsed() < STATUS_MESSAGE_TIMEOUT)
            .map(|s| s.text.as_str())
    }

    pub fn insert_char(&mut self, c: u8) {
        let pos = self.buffer.insert_char(self.cursor.position(), c);
        self.cursor.set_position(pos);
    }

    /// カーソルの前の文字を削除 (行頭では前の行と結合)
    pub fn delete_char(&mut self) {
        let pos = self.buffer.delete_char_before(self.cursor.position());
        self.cursor.set_position(pos);
    }

    pub fn insert_newline(&mut self) {
        let pos = self.buffer.insert_newline(self.cursor.position());
        self.cursor.set_position(pos);
    }

    /// スクロール位置を合わせて 1 フレーム描画する
    ///
    /// 書き込みに失敗しても再試行しない。
    pub fn refresh_screen(&mut self, term: &mut impl TerminalIo) {
        self.cursor
            .scroll(&self.buffer, self.screen_rows, self.screen_cols);

        let view = View {
            buffer: &self.buffer,
            cursor: &self.cursor,
            filename: self.filename.as_deref(),
            message: self.status_message(),
            screen_rows: self.screen_rows,
            screen_cols: self.screen_cols,
        };

        let frame = match Screen::render(&view) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("failed to compose frame: {e}");
                return;
            }
        };
        if let Err(e) = term.write_bytes(&frame) {
            log::warn!("dropped frame of {} bytes: {e}", frame.len());
        }
    }

    /// 終了キーが確定するまで描画とキー処理を繰り返す
    pub fn run(&mut self, term: &mut impl TerminalIo) -> Result<()> {
        loop {
            self.refresh_screen(term);
            let key = key::read_key(term)?;
            if self.process_key(term, key)? == Action::Quit {
                log::info!("quit");
                return Ok(());
            }
        }
    }

    pub fn process_key(&mut self, term: &mut impl TerminalIo, key: Key) -> Result<Action> {
        match key {
            Key::Enter => self.insert_newline(),
            Key::Quit => {
                if self.buffer.is_dirty() && self.quit_times > 0 {
                    self.set_status_message(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(Action::Continue);
                }
                return Ok(Action::Quit);
            }
            Key::Save => self.save(term)?,
            Key::Find => self.find(term)?,
            Key::Home => self.cursor.move_home(),
            Key::End => self.cursor.move_end(&self.buffer),
            Key::Backspace => self.delete_char(),
            Key::Delete => {
                self.cursor.move_right(&self.buffer);
                self.delete_char();
            }
            Key::PageUp => self.cursor.page_up(&self.buffer, self.screen_rows),
            Key::PageDown => self.cursor.page_down(&self.buffer, self.screen_rows),
            Key::ArrowUp => self.cursor.move_up(&self.buffer),
            Key::ArrowDown => self.cursor.move_down(&self.buffer),
            Key::ArrowLeft => self.cursor.move_left(&self.buffer),
            Key::ArrowRight => self.cursor.move_right(&self.buffer),
            Key::Refresh | Key::Escape => {}
            Key::Char(_) => {
                if let Some(c) = key.insertable() {
                    self.insert_char(c);
                }
            }
        }

        self.quit_times = KILO_QUIT_TIMES;
        Ok(Action::Continue)
    }

    /// 保存する。失敗してもエラーはステータスメッセージにのみ出す
    pub fn save(&mut self, term: &mut impl TerminalIo) -> Result<()> {
        let filename = match self.filename.clone() {
            Some(filename) => filename,
            None => match self.prompt(term, |input| format!("Save as: {input} (ESC to cancel)"), None)? {
                Some(filename) => {
                    self.buffer.set_syntax(Syntax::for_filename(&filename));
                    self.filename = Some(filename.clone());
                    filename
                }
                None => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            },
        };

        let content = self.buffer.to_bytes();
        match FileIO::save(&filename, &content) {
            Ok(written) => {
                self.buffer.mark_clean();
                log::info!("saved {written} bytes to {filename}");
                self.set_status_message(format!("{written} bytes written to disk"));
            }
            Err(e) => {
                log::warn!("failed to save {filename}: {e}");
                self.set_status_message(format!("Can't save! I/O error: {e}"));
            }
        }
        Ok(())
    }

    /// インクリメンタル検索。Escape で開始前の位置に戻る
    pub fn find(&mut self, term: &mut impl TerminalIo) -> Result<()> {
        let saved = self.cursor;
        let mut search = SearchState::new();

        let query = self.prompt(
            term,
            |input| format!("Search: {input} (Use ESC/Arrows/Enter)"),
            Some(&mut search),
        )?;

        if query.is_none() {
            self.cursor = saved;
        }
        Ok(())
    }

    /// メッセージ行で 1 行入力を受け付ける
    ///
    /// Enter で入力を返し、Escape で `None` を返す。空のまま Enter しても確定しない。
    pub fn prompt(
        &mut self,
        term: &mut impl TerminalIo,
        message: impl Fn(&str) -> String,
        mut handler: Option<&mut dyn PromptHandler>,
    ) -> Result<Option<String>> {
        let mut input = String::new();

        loop {
            self.set_status_message(message(&input));
            self.refresh_screen(term);

            let key = key::read_key(term)?;
            match key {
                Key::Backspace | Key::Delete => {
                    input.pop();
                }
                Key::Escape => {
                    self.set_status_message("");
                    if let Some(handler) = handler.as_deref_mut() {
                        handler.on_key(self, &input, key);
                    }
                    return Ok(None);
                }
                Key::Enter if !input.is_empty() => {
                    self.set_status_message("");
                    if let Some(handler) = handler.as_deref_mut() {
                        handler.on_key(self, &input, key);
                    }
                    return Ok(Some(input));
                }
                Key::Char(c) if c.is_ascii() && !c.is_ascii_control() => input.push(char::from(c)),
                _ => {}
            }

            if let Some(handler) = handler.as_deref_mut() {
                handler.on_key(self, &input, key);
            }
        }
    }
}
