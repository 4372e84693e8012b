use std::path::PathBuf;

use crate::error::{Error, Result};

/// デバッグログの出力先を指定する環境変数
pub const LOG_ENV: &str = "KILO_LOG";

const USAGE: &str = "kilo [filename]";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub filename: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// プロセス引数と環境変数から設定を組み立てる
    pub fn from_env() -> Result<Self> {
        let log_path = std::env::var_os(LOG_ENV).map(PathBuf::from);
        Self::parse(std::env::args().skip(1), log_path)
    }

    /// `args` にはプログラム名を含めない
    pub fn parse<I>(args: I, log_path: Option<PathBuf>) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut filename = None;

        for arg in args {
            if arg.starts_with('-') && arg != "-" {
                return Err(Error::Usage(format!("unknown option '{arg}'\n{USAGE}")));
            }
            if filename.is_some() {
                return Err(Error::Usage(format!("too many arguments\n{USAGE}")));
            }
            filename = Some(arg);
        }

        Ok(Self { filename, log_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        let config = Config::parse(args(&[]), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_single_filename() {
        let config = Config::parse(args(&["main.c"]), Some(PathBuf::from("kilo.log"))).unwrap();
        assert_eq!(config.filename.as_deref(), Some("main.c"));
        assert_eq!(config.log_path, Some(PathBuf::from("kilo.log")));
    }

    #[test]
    fn test_rejects_flags() {
        let err = Config::parse(args(&["--help"]), None).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn test_rejects_extra_arguments() {
        let err = Config::parse(args(&["a.c", "b.c"]), None).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
