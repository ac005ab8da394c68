//! # NiriSetup CLI Entry Point
//!
//! Interactive assistant that installs and configures the Niri Wayland
//! compositor on FreeBSD.
//!
//! ## Usage
//!
//! ```bash
//! # Run the assistant from the directory that holds config.kdl
//! nirisetup
//!
//! # Use a different settings file
//! nirisetup --settings ./settings.json
//!
//! # Print the resolved plan and exit
//! nirisetup --debug
//! ```
//!
//! ## Startup
//!
//! 1. **Logging**: diagnostics go to `<tmp>/nirisetup-debug.log`
//! 2. **Runtime directory**: `XDG_RUNTIME_DIR` is prepared and exported
//!    before the async runtime starts; any failure aborts before the UI
//!    exists
//! 3. **Settings**: loaded from `~/.config/nirisetup/settings.json`
//! 4. **UI**: menu loop until quit
//!
//! ## Key Bindings
//!
//! - `↑` / `k` - Move up
//! - `↓` / `j` - Move down
//! - `Enter` - Run the highlighted action
//! - `q` / `Ctrl+C` - Quit

use nirisetup::action::{ActionCompleted, ActionRunner, SystemCommandRunner};
use nirisetup::config::Settings;
use nirisetup::runtime;
use nirisetup::ui::app::{Effect, STARTUP_MESSAGE};
use nirisetup::ui::theme::Theme;
use nirisetup::ui::{self, keys, App};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Diagnostic log file name under the temp directory.
const DEBUG_LOG_FILE: &str = "nirisetup-debug.log";

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// NiriSetup - install and configure Niri on FreeBSD
#[derive(Parser, Debug)]
#[command(name = "nirisetup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install and configure the Niri Wayland compositor on FreeBSD", long_about = None)]
struct Args {
    /// Settings file to use instead of ~/.config/nirisetup/settings.json
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Print the resolved actions, packages and paths, then exit
    #[arg(long)]
    debug: bool,

    /// Write debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);
    log::info!("NiriSetup {} starting", env!("CARGO_PKG_VERSION"));

    let tokio_runtime = bootstrap()?;

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = tokio_runtime.block_on(run_application(args));

    // Restore panic hook
    let _ = panic::take_hook();

    if let Err(err) = &result {
        log::error!("{:#}", err);
    }
    result
}

/// Export the runtime directory, then build the async runtime.
///
/// `XDG_RUNTIME_DIR` must be set while the process is still single-threaded,
/// so this runs before any worker thread exists. Failure is fatal.
fn bootstrap() -> Result<tokio::runtime::Runtime> {
    let runtime_dir =
        runtime::init_runtime_env().context("Failed to set up the runtime directory")?;
    log::info!("Runtime directory ready at {}", runtime_dir.display());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")
}

/// Send diagnostics to a file; the terminal belongs to the UI.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let path = std::env::temp_dir().join(DEBUG_LOG_FILE);

    if let Ok(log_file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

async fn run_application(args: Args) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    let theme = Theme::by_name(&settings.theme).unwrap_or_else(|| {
        log::warn!("Unknown theme '{}', using default", settings.theme);
        Theme::default_theme()
    });

    let working_dir = std::env::current_dir().context("Failed to get current working directory")?;
    let base_dirs = directories::BaseDirs::new().context("Could not determine home directory")?;
    let runner_config =
        settings.runner_config(&working_dir, base_dirs.home_dir(), &std::env::temp_dir());

    if args.debug {
        print_plan(&runner_config, theme);
        return Ok(());
    }

    let runner = Arc::new(ActionRunner::new(runner_config, Arc::new(SystemCommandRunner)));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new();
    app.note(STARTUP_MESSAGE);

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut terminal, &mut app, theme, runner, &mut event_reader).await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    run_result?;
    cleanup_result?;

    Ok(())
}

fn print_plan(config: &nirisetup::action::RunnerConfig, theme: &Theme) {
    println!("=== Actions ===");
    for action in nirisetup::action::Action::all() {
        println!("  {:<10} {}", action.id(), action.label());
    }
    println!("\n=== Packages ({}) ===", config.packages.len());
    for package in &config.packages {
        println!("  {} {}", config.install_command.join(" "), package);
    }
    println!("\n=== Paths ===");
    println!("  Source config:  {}", config.source_config.display());
    println!("  Config dir:     {}", config.config_dir.display());
    println!("  Session log:    {}", config.log_file.display());
    if let Some(dir) = runtime::runtime_dir() {
        println!("  Runtime dir:    {}", dir.display());
    }
    println!("\n=== Validator ===");
    println!("  {}", config.validate_command.join(" "));
    println!("\nTheme: {}", theme.name);
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    runner: Arc<ActionRunner>,
    event_reader: &mut dyn EventReader,
) -> Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ActionCompleted>();

    loop {
        while let Ok(done) = events_rx.try_recv() {
            app.complete(done.action, done.result);
        }

        terminal
            .draw(|f| ui::render(f, app, theme))
            .context("Failed to draw terminal UI")?;

        if app.should_quit() {
            break;
        }

        let poll_timeout = if app.is_processing() {
            Duration::from_millis(150) // animate the processing indicator
        } else {
            Duration::from_millis(250)
        };

        let Some(event) = event_reader.read_event(poll_timeout)? else {
            app.tick();
            continue;
        };

        let Event::Key(key) = event else {
            continue;
        };
        let Some(input) = keys::map_key(&key) else {
            continue;
        };

        match app.handle_input(input) {
            Effect::Dispatch(request) => {
                Arc::clone(&runner).spawn(request, events_tx.clone());
            }
            Effect::Quit | Effect::None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl MockEventReader {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: VecDeque::from(events),
            }
        }
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_mock_event_reader() {
        let mut reader =
            MockEventReader::new(vec![key_event(KeyCode::Down), key_event(KeyCode::Enter)]);

        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).expect("read"),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Down,
                ..
            }))
        ));
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).expect("read"),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            }))
        ));
        assert!(reader
            .read_event(Duration::from_millis(10))
            .expect("read")
            .is_none());
    }

    #[test]
    fn test_crossterm_event_reader_type() {
        let _reader: Box<dyn EventReader> = Box::new(CrosstermEventReader);
    }

    #[test]
    fn test_bootstrap_exports_runtime_dir_to_async_tasks() {
        let tokio_runtime = bootstrap().expect("bootstrap");
        let expected = runtime::runtime_dir().expect("initialized").to_path_buf();

        let seen = tokio_runtime.block_on(async {
            tokio::spawn(async { std::env::var_os(runtime::RUNTIME_DIR_VAR) })
                .await
                .expect("task")
        });

        assert_eq!(seen.map(PathBuf::from), Some(expected));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["nirisetup"]).expect("parse");
        assert!(args.settings.is_none());
        assert!(!args.debug);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_with_settings_and_debug() {
        let args = Args::try_parse_from(["nirisetup", "--settings", "/etc/nirisetup.json", "--debug"])
            .expect("parse");
        assert_eq!(args.settings, Some(PathBuf::from("/etc/nirisetup.json")));
        assert!(args.debug);
    }

    #[test]
    fn test_args_reject_subcommands() {
        assert!(Args::try_parse_from(["nirisetup", "install"]).is_err());
    }

    #[tokio::test]
    async fn test_run_application_reports_broken_settings() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{ broken").expect("write");

        let args = Args {
            settings: Some(path),
            debug: true,
            verbose: false,
        };

        let err = run_application(args).await.expect_err("broken settings");
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[tokio::test]
    async fn test_run_application_debug_mode_exits_cleanly() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("create temp dir");
        let args = Args {
            settings: Some(temp_dir.path().join("absent.json")),
            debug: true,
            verbose: false,
        };

        assert!(run_application(args).await.is_ok());
    }
}
