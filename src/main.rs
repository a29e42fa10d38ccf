use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use snake::config::{BoardSize, DEFAULT_BOARD_SIZE, FRAME_POLL_INTERVAL};
use snake::game::{Game, TickOutcome};
use snake::input::{self, GameInput};
use snake::renderer::{self, Screen};
use snake::score::{APP_DIR_NAME, FileScoreStore, HighScoreStore, MemoryScoreStore};
use snake::terminal_runtime::TerminalSession;
use snake::tick::TickSchedule;

const LOG_FILE_NAME: &str = "snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Side length of the square board, in cells.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: u16,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// High-score file (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    scores_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long, conflicts_with = "scores_file")]
    no_persist: bool,

    /// Log file (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let board = BoardSize::new(cli.board_size)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    // Raw mode hides stderr, so problems are reported before entering it.
    if let Err(error) = init_logging(&cli) {
        eprintln!("Logging disabled: {error}");
    }

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryScoreStore::new())
    } else {
        let store = cli
            .scores_file
            .clone()
            .map_or_else(FileScoreStore::at_default_location, FileScoreStore::new);
        info!("high score file: {}", store.path().display());
        Box::new(store)
    };

    let game = match cli.seed {
        Some(seed) => Game::new_with_seed(board, store, seed),
        None => Game::new(board, store),
    };
    if !game.high_score_is_persistent() {
        eprintln!("High score could not be read; this session keeps it in memory only.");
    }

    let mut session = TerminalSession::enter()?;
    let result = run(&mut session, game);
    drop(session);

    info!("exiting");
    result
}

fn run<S: HighScoreStore>(session: &mut TerminalSession, mut game: Game<S>) -> io::Result<()> {
    let schedule = TickSchedule::default();
    let mut shell = Shell::new(Instant::now());

    loop {
        let snapshot = game.snapshot();
        let interval = schedule.interval_for_score(snapshot.score);
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot, shell.screen, interval))?;

        if let Some(game_input) = input::poll_input(FRAME_POLL_INTERVAL)? {
            if game_input == GameInput::Quit {
                break;
            }
            shell.handle_input(&mut game, game_input, Instant::now());
        }

        if shell.screen != Screen::Running || game.is_over() {
            continue;
        }

        let now = Instant::now();
        if shell.tick_due(schedule.interval_for_score(game.score()), now) {
            shell.last_tick = now;
            if let TickOutcome::Died(_) | TickOutcome::Won = game.advance() {
                info!(
                    "final score {}, high score {}",
                    game.score(),
                    game.high_score()
                );
            }
        }
    }

    Ok(())
}

/// Screen shown around the engine and the time of the last tick.
#[derive(Debug)]
struct Shell {
    screen: Screen,
    last_tick: Instant,
}

impl Shell {
    fn new(now: Instant) -> Self {
        Self {
            screen: Screen::Start,
            last_tick: now,
        }
    }

    /// Applies one input. Starting, resuming and restarting all restart the
    /// tick clock, so the first move of a run waits a full interval.
    fn handle_input<S: HighScoreStore>(
        &mut self,
        game: &mut Game<S>,
        input: GameInput,
        now: Instant,
    ) {
        let next = match (self.screen, input) {
            (Screen::Start, GameInput::Confirm) => Screen::Running,
            (_, GameInput::Confirm) if game.is_over() => {
                game.restart();
                self.last_tick = now;
                Screen::Running
            }
            (Screen::Running, GameInput::Pause) if !game.is_over() => Screen::Paused,
            (Screen::Paused, GameInput::Pause) => Screen::Running,
            (Screen::Running, GameInput::Direction(direction)) => {
                game.request_direction(direction);
                Screen::Running
            }
            (current, _) => current,
        };

        if self.screen != Screen::Running && next == Screen::Running {
            self.last_tick = now;
        }
        self.screen = next;
    }

    fn tick_due(&self, interval: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= interval
    }
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let level = LevelFilter::from(cli.log_level);
    if level == LevelFilter::Off {
        return Ok(());
    }

    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let file = create_log_file(&path)?;

    WriteLogger::init(level, Config::default(), file).map_err(io::Error::other)?;
    info!("starting, log level {level}");
    Ok(())
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

fn create_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}
