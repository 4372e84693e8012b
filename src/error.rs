use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 続行不能なエラー
///
/// これらが発生した場合は画面をクリアし、端末モードを戻してから終了する。
/// 保存失敗などの回復可能なエラーはステータスメッセージで扱うため含まない。
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to configure terminal mode")]
    RawMode(#[source] io::Error),

    #[error("failed to read from terminal")]
    Read(#[source] io::Error),

    #[error("failed to query window size")]
    WindowSize(#[source] io::Error),

    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
