use std::io::{stdout, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};

use space_invaders::config::Config;
use space_invaders::draw::TerminalSink;
use space_invaders::driver::Core;
use space_invaders::files::FileManager;
use space_invaders::input::InputManager;
use space_invaders::logging;
use space_invaders::screen::SinkFrame;

#[derive(Parser, Debug)]
#[command(name = "space_invaders", about = "Terminal Space Invaders")]
struct Args {
    /// TOML config file; missing means defaults.
    #[arg(long, default_value = "space_invaders.toml")]
    config: PathBuf,

    /// File the log is appended to.
    #[arg(long, default_value = "space_invaders.log")]
    log_file: PathBuf,

    /// Directory holding the save file.
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(err) = logging::init(&args.log_file) {
        eprintln!("logging disabled: {err}");
    }

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(dir) = args.save_dir {
        config.save_dir = Some(dir);
    }
    let files = FileManager::new(config.save_dir());
    tracing::info!(save_dir = %files.dir().display(), "starting");

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them; the hold window
    // covers terminals that don't.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let input = InputManager::new();
    let result = input
        .spawn_reader()
        .context("starting input thread")
        .map(|_reader| {
            let frame = SinkFrame::new(TerminalSink::new(BufWriter::new(stdout())));
            Core::new(frame, config, input.clone(), files).run();
        });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
