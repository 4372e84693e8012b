use std::io::{self, Read, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use termion::AsyncReader;
use termion::raw::{IntoRawMode, RawTerminal};

use crate::error::{Error, Result};

/// 1 バイト読み取りを待つ最大時間 (termios の VTIME=1 相当)
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// エディタが端末に要求する入出力
pub trait TerminalIo {
    /// 短いタイムアウト付きで 1 バイト読む。データが無ければ `Ok(None)`
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// (cols, rows)
    fn size(&self) -> (u16, u16);
}

pub struct Terminal {
    stdout: RawTerminal<Stdout>,
    stdin: AsyncReader,
    size: (u16, u16),
}

impl Terminal {
    /// raw mode に切り替え、ウィンドウサイズを取得する
    pub fn new() -> Result<Self> {
        let stdout = io::stdout().into_raw_mode().map_err(Error::RawMode)?;
        let size = termion::terminal_size().map_err(Error::WindowSize)?;
        log::debug!("terminal size: {}x{}", size.0, size.1);
        Ok(Self {
            stdout,
            stdin: termion::async_stdin(),
            size,
        })
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1)
        )?;
        self.stdout.flush()
    }
}

impl TerminalIo for Terminal {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let deadline = Instant::now() + READ_TIMEOUT;
        let mut byte = [0u8; 1];
        loop {
            match self.stdin.read(&mut byte) {
                Ok(1) => return Ok(Some(byte[0])),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdout.write_all(bytes)?;
        self.stdout.flush()
    }

    fn size(&self) -> (u16, u16) {
        self.size
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア。raw mode の復元は RawTerminal の drop が行う
        let _ = self.clear_screen();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::io;

    use super::TerminalIo;

    /// テスト用の端末
    ///
    /// `None` は「タイムアウトまでに入力なし」を表す。
    /// 入力を使い切ると EOF エラーを返すので、テストが無限に待つことはない。
    pub struct FakeTerminal {
        input: VecDeque<Option<u8>>,
        pub output: Vec<u8>,
        pub writes: usize,
        size: (u16, u16),
    }

    impl FakeTerminal {
        pub fn new(cols: u16, rows: u16) -> Self {
            Self {
                input: VecDeque::new(),
                output: Vec::new(),
                writes: 0,
                size: (cols, rows),
            }
        }

        pub fn push_bytes(&mut self, bytes: &[u8]) {
            self.input.extend(bytes.iter().copied().map(Some));
        }

        pub fn push_timeout(&mut self) {
            self.input.push_back(None);
        }

        pub fn output_str(&self) -> String {
            String::from_utf8_lossy(&self.output).into_owned()
        }
    }

    impl TerminalIo for FakeTerminal {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            match self.input.pop_front() {
                Some(byte) => Ok(byte),
                None => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "scripted input exhausted",
                )),
            }
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.output.extend_from_slice(bytes);
            self.writes += 1;
            Ok(())
        }

        fn size(&self) -> (u16, u16) {
            self.size
        }
    }
}
