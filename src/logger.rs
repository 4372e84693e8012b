use std::io;
use std::path::Path;

/// ファイルロガーを初期化する
///
/// 標準出力は画面描画専用なので、ログは必ずファイルへ書き出す。
/// debug build でのみ有効で、release build では何もしない。
pub fn init(path: &Path) -> io::Result<()> {
    #[cfg(debug_assertions)]
    {
        use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
        use std::fs::OpenOptions;

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let config = ConfigBuilder::new().set_time_format_rfc3339().build();
        // 二重初期化はテストで起こりうるので無視する
        let _ = WriteLogger::init(LevelFilter::Debug, config, file);
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kilo.log");

        init(&path).unwrap();
        log::info!("logger test");

        if cfg!(debug_assertions) {
            assert!(path.exists());
        }
    }
}
