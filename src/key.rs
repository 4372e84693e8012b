use crate::error::{Error, Result};
use crate::terminal::TerminalIo;

const ESC: u8 = 0x1b;
const BACKSPACE: u8 = 127;

const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// デコード済みのキー入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// 制御コマンドに割り当てられていないバイト
    Char(u8),
    Enter,
    Escape,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    /// Ctrl-Q
    Quit,
    /// Ctrl-S
    Save,
    /// Ctrl-F
    Find,
    /// Ctrl-L
    Refresh,
}

impl Key {
    /// 1 バイトをキーに変換する (エスケープシーケンス以外)
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'\r' => Key::Enter,
            BACKSPACE => Key::Backspace,
            ESC => Key::Escape,
            b if b == ctrl(b'h') => Key::Backspace,
            b if b == ctrl(b'q') => Key::Quit,
            b if b == ctrl(b's') => Key::Save,
            b if b == ctrl(b'f') => Key::Find,
            b if b == ctrl(b'l') => Key::Refresh,
            b => Key::Char(b),
        }
    }

    /// 文書に挿入できる文字か
    ///
    /// ASCII の印字可能文字とタブのみ。
    pub fn insertable(self) -> Option<u8> {
        match self {
            Key::Char(b) if b == b'\t' || (b.is_ascii() && !b.is_ascii_control()) => Some(b),
            _ => None,
        }
    }
}

/// キーを 1 つ読み取るまでブロックする
///
/// ESC の後続 2 バイトがタイムアウト内に届かなければ単独の Escape とみなす。
pub fn read_key(term: &mut impl TerminalIo) -> Result<Key> {
    let byte = loop {
        if let Some(byte) = term.read_byte().map_err(Error::Read)? {
            break byte;
        }
    };

    if byte != ESC {
        return Ok(Key::from_byte(byte));
    }

    let Some(first) = term.read_byte().map_err(Error::Read)? else {
        return Ok(Key::Escape);
    };
    let Some(second) = term.read_byte().map_err(Error::Read)? else {
        return Ok(Key::Escape);
    };

    let key = match (first, second) {
        (b'[', digit) if digit.is_ascii_digit() => {
            match term.read_byte().map_err(Error::Read)? {
                Some(b'~') => match digit {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                },
                _ => Key::Escape,
            }
        }
        (b'[', b'A') => Key::ArrowUp,
        (b'[', b'B') => Key::ArrowDown,
        (b'[', b'C') => Key::ArrowRight,
        (b'[', b'D') => Key::ArrowLeft,
        (b'[', b'H') | (b'O', b'H') => Key::Home,
        (b'[', b'F') | (b'O', b'F') => Key::End,
        _ => Key::Escape,
    };

    if key == Key::Escape {
        log::debug!("unrecognized escape sequence: {first:#04x} {second:#04x}");
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::testing::FakeTerminal;

    fn decode(bytes: &[u8]) -> Key {
        let mut term = FakeTerminal::new(80, 24);
        term.push_bytes(bytes);
        read_key(&mut term).unwrap()
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(decode(b"a"), Key::Char(b'a'));
        assert_eq!(decode(b"\t"), Key::Char(b'\t'));
        assert_eq!(decode(b"\r"), Key::Enter);
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(decode(&[ctrl(b'q')]), Key::Quit);
        assert_eq!(decode(&[ctrl(b's')]), Key::Save);
        assert_eq!(decode(&[ctrl(b'f')]), Key::Find);
        assert_eq!(decode(&[ctrl(b'l')]), Key::Refresh);
        assert_eq!(decode(&[ctrl(b'h')]), Key::Backspace);
        assert_eq!(decode(&[127]), Key::Backspace);
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(decode(b"\x1b[A"), Key::ArrowUp);
        assert_eq!(decode(b"\x1b[B"), Key::ArrowDown);
        assert_eq!(decode(b"\x1b[C"), Key::ArrowRight);
        assert_eq!(decode(b"\x1b[D"), Key::ArrowLeft);
    }

    #[test]
    fn test_tilde_sequences() {
        assert_eq!(decode(b"\x1b[1~"), Key::Home);
        assert_eq!(decode(b"\x1b[7~"), Key::Home);
        assert_eq!(decode(b"\x1b[4~"), Key::End);
        assert_eq!(decode(b"\x1b[8~"), Key::End);
        assert_eq!(decode(b"\x1b[5~"), Key::PageUp);
        assert_eq!(decode(b"\x1b[6~"), Key::PageDown);
        assert_eq!(decode(b"\x1b[3~"), Key::Delete);
        assert_eq!(decode(b"\x1b[9~"), Key::Escape);
    }

    #[test]
    fn test_home_end_alternate_encodings() {
        assert_eq!(decode(b"\x1b[H"), Key::Home);
        assert_eq!(decode(b"\x1b[F"), Key::End);
        assert_eq!(decode(b"\x1bOH"), Key::Home);
        assert_eq!(decode(b"\x1bOF"), Key::End);
    }

    #[test]
    fn test_bare_escape_on_timeout() {
        let mut term = FakeTerminal::new(80, 24);
        term.push_bytes(b"\x1b");
        term.push_timeout();
        term.push_bytes(b"x");
        assert_eq!(read_key(&mut term).unwrap(), Key::Escape);
        // タイムアウト後のバイトは次のキーとして読まれる
        assert_eq!(read_key(&mut term).unwrap(), Key::Char(b'x'));
    }

    #[test]
    fn test_escape_timeout_after_first_byte() {
        let mut term = FakeTerminal::new(80, 24);
        term.push_bytes(b"\x1b[");
        term.push_timeout();
        assert_eq!(read_key(&mut term).unwrap(), Key::Escape);
    }

    #[test]
    fn test_unrecognized_sequence_is_escape() {
        assert_eq!(decode(b"\x1b[Z"), Key::Escape);
        assert_eq!(decode(b"\x1bxy"), Key::Escape);
    }

    #[test]
    fn test_waits_through_idle_reads() {
        let mut term = FakeTerminal::new(80, 24);
        term.push_timeout();
        term.push_timeout();
        term.push_bytes(b"k");
        assert_eq!(read_key(&mut term).unwrap(), Key::Char(b'k'));
    }

    #[test]
    fn test_read_error_is_fatal() {
        let mut term = FakeTerminal::new(80, 24);
        assert!(matches!(read_key(&mut term), Err(Error::Read(_))));
    }

    #[test]
    fn test_insertable() {
        assert_eq!(Key::Char(b'a').insertable(), Some(b'a'));
        assert_eq!(Key::Char(b'\t').insertable(), Some(b'\t'));
        assert_eq!(Key::Char(1).insertable(), None);
        assert_eq!(Key::Char(200).insertable(), None);
        assert_eq!(Key::Enter.insertable(), None);
    }
}
