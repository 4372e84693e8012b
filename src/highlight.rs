use termion::color::AnsiValue;

use crate::row::Row;
use crate::syntax::{KEYWORD2_MARKER, Syntax};

/// 表示用の各バイトの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

impl Highlight {
    /// 端末の前景色
    pub fn color(self) -> AnsiValue {
        match self {
            Highlight::Comment | Highlight::MlComment => AnsiValue(6),
            Highlight::Keyword1 => AnsiValue(3),
            Highlight::Keyword2 => AnsiValue(2),
            Highlight::String => AnsiValue(5),
            Highlight::Number => AnsiValue(1),
            Highlight::Match => AnsiValue(4),
            Highlight::Normal => AnsiValue(7),
        }
    }
}

pub fn is_separator(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'\0' || b",.()+-/*=~%<>[];".contains(&c)
}

/// `at` 行の強調表示を計算し直す
///
/// 行末のコメント状態が変わった場合は次の行も計算し直す。
/// 状態が変わらなくなった時点、または最終行で止まるので、
/// 1 回の呼び出しで各行を高々 1 度ずつしか走査しない。
pub fn update_syntax(rows: &mut [Row], at: usize, syntax: Option<&Syntax>) {
    let mut at = at;
    while at < rows.len() {
        let in_comment = at > 0 && rows[at - 1].open_comment();
        let (hl, open_comment) = highlight_line(rows[at].render(), syntax, in_comment);
        let changed = rows[at].set_highlight(hl, open_comment);
        if !changed {
            break;
        }
        at += 1;
    }
}

/// 1 行分の分類と、行末でブロックコメントの途中かを返す
pub fn highlight_line(
    render: &[u8],
    syntax: Option<&Syntax>,
    in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.singleline_comment_start.as_bytes();
    let mcs = syntax.multiline_comment_start.as_bytes();
    let mce = syntax.multiline_comment_end.as_bytes();

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = in_comment;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };
        let rest = &render[i..];

        if !scs.is_empty() && in_string.is_none() && !in_comment && rest.starts_with(scs) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if !mcs.is_empty() && !mce.is_empty() && in_string.is_none() {
            if in_comment {
                hl[i] = Highlight::MlComment;
                if rest.starts_with(mce) {
                    hl[i..i + mce.len()].fill(Highlight::MlComment);
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if rest.starts_with(mcs) {
                hl[i..i + mcs.len()].fill(Highlight::MlComment);
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.highlights_strings() {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlights_numbers()
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(rest, syntax.keywords) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

/// `text` の先頭がキーワードで、直後が区切り文字 (または行末) なら長さと分類を返す
fn match_keyword(text: &[u8], keywords: &[&str]) -> Option<(usize, Highlight)> {
    keywords.iter().find_map(|keyword| {
        let keyword = keyword.as_bytes();
        let (word, class) = match keyword.split_last() {
            Some((&KEYWORD2_MARKER, word)) => (word, Highlight::Keyword2),
            _ => (keyword, Highlight::Keyword1),
        };
        let followed_by_sep = text.get(word.len()).is_none_or(|&c| is_separator(c));
        (!word.is_empty() && text.starts_with(word) && followed_by_sep)
            .then_some((word.len(), class))
    })
}
