use anyhow::Context;

use kilo::KILO_VERSION;
use kilo::config::Config;
use kilo::editor::{Editor, HELP_MESSAGE};
use kilo::logger;
use kilo::terminal::{Terminal, TerminalIo};

fn main() {
    if let Err(err) = run() {
        // Terminal は run の中で drop 済みなので、画面クリアと raw mode の復元は終わっている
        eprintln!("kilo: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    if let Some(path) = &config.log_path {
        logger::init(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }
    log::info!("kilo {KILO_VERSION} starting");

    let mut terminal = Terminal::new()?;
    let mut editor = Editor::new(terminal.size());

    if let Some(filename) = config.filename {
        editor.open_file(filename)?;
    }
    editor.set_status_message(HELP_MESSAGE);

    editor.run(&mut terminal)?;
    Ok(())
}
