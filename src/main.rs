use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::audio::{AudioCues, Muted, TerminalBell};
use grid_snake::config::{GameConfig, THEME_CLASSIC};
use grid_snake::controller::GameController;
use grid_snake::game::GameStatus;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};

/// Longest wait for input while no tick is scheduled.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell cues.
    #[arg(long = "no-sound")]
    no_sound: bool,

    /// Write logs here; filtered by RUST_LOG, default `info`.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let mut config = match GameConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            process::exit(2);
        }
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_sound {
        config.sound = false;
    }

    install_panic_hook();
    run(config)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();

    Ok(())
}

fn run(config: GameConfig) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();

    let audio: Box<dyn AudioCues> = if config.sound {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Muted)
    };
    let mut controller = GameController::new(config, session.viewport()?, audio);
    controller.start(Instant::now());

    loop {
        session.draw(&controller.snapshot(), &THEME_CLASSIC)?;

        let timeout = controller
            .time_until_tick(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL);

        if let Some(game_input) = input.poll_input(timeout)? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Restart
                    if controller.state().status() == GameStatus::GameOver =>
                {
                    controller.restart(Instant::now());
                }
                GameInput::Restart => {}
                GameInput::Direction(direction) => {
                    controller.set_direction(direction);
                }
                GameInput::Resize(viewport) => {
                    controller.resize(viewport);
                }
            }
        }

        controller.advance(Instant::now());
    }

    log::info!("quit at score {}", controller.state().score());
    Ok(())
}
