pub mod buffer;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod file_io;
pub mod highlight;
pub mod key;
pub mod logger;
pub mod row;
pub mod screen;
pub mod search;
pub mod syntax;
pub mod terminal;

use std::time::Duration;

// エディタ動作の定数
pub const KILO_VERSION: &str = "0.8";
pub const KILO_TAB_STOP: usize = 8;
pub const KILO_QUIT_TIMES: usize = 2;
pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

// 画面レイアウト定数
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const MESSAGE_BAR_HEIGHT: u16 = 1;
pub const UI_HEIGHT: u16 = STATUS_BAR_HEIGHT + MESSAGE_BAR_HEIGHT;
