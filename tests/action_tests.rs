//! Action runner tests
//!
//! Install, validate and save-logs scenarios against a recording fake
//! command runner, plus end-to-end flows through the controller.

use anyhow::Result;
use async_trait::async_trait;
use nirisetup::action::{
    Action, ActionCompleted, ActionRequest, ActionRunner, CommandOutput, CommandRunner,
    RunnerConfig,
};
use nirisetup::ui::app::{Effect, Input, Screen};
use nirisetup::ui::App;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Records every invocation; arguments listed in `failing` exit 1.
#[derive(Default)]
struct FakeCommandRunner {
    calls: Mutex<Vec<Vec<String>>>,
    failing: Vec<String>,
    missing_program: bool,
}

impl FakeCommandRunner {
    fn failing_on(arg: &str) -> Self {
        Self {
            failing: vec![arg.to_string()],
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.lock().expect("lock").push(call);

        if self.missing_program {
            anyhow::bail!("Failed to execute '{}'", program);
        }

        if args.iter().any(|a| self.failing.contains(a)) {
            let last = args.last().cloned().unwrap_or_default();
            return Ok(CommandOutput {
                code: Some(1),
                combined: format!("pkg: No packages available to install matching '{}'\n", last),
            });
        }

        Ok(CommandOutput {
            code: Some(0),
            combined: String::new(),
        })
    }
}

struct Fixture {
    temp_dir: TempDir,
    commands: Arc<FakeCommandRunner>,
    runner: Arc<ActionRunner>,
}

impl Fixture {
    fn new(packages: &[&str], commands: FakeCommandRunner) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path();
        fs::write(root.join("config.kdl"), "input { keyboard {} }\n").expect("seed config");

        let config = RunnerConfig {
            packages: packages.iter().map(|p| (*p).to_string()).collect(),
            install_command: vec![
                "sudo".to_string(),
                "pkg".to_string(),
                "install".to_string(),
                "-y".to_string(),
            ],
            validate_command: vec!["niri".to_string(), "validate".to_string()],
            source_config: root.join("config.kdl"),
            config_dir: root.join("home").join(".config").join("niri"),
            log_file: root.join("tmp").join("nirisetup.log"),
        };
        fs::create_dir_all(root.join("tmp")).expect("tmp dir");

        let commands = Arc::new(commands);
        let runner = Arc::new(ActionRunner::new(
            config,
            Arc::clone(&commands) as Arc<dyn CommandRunner>,
        ));

        Self {
            temp_dir,
            commands,
            runner,
        }
    }

    fn copied_config(&self) -> std::path::PathBuf {
        self.runner.config().config_dir.join("config.kdl")
    }

    fn request(action: Action) -> ActionRequest {
        ActionRequest {
            action,
            log_snapshot: Vec::new(),
        }
    }
}

#[tokio::test]
async fn test_install_stops_at_first_failure() {
    let fixture = Fixture::new(&["x", "y", "z"], FakeCommandRunner::failing_on("y"));

    let result = fixture.runner.run(Fixture::request(Action::Install)).await;

    assert!(!result.succeeded);
    assert!(result.message.contains("y"));
    assert!(result.message.starts_with("Failed to install y"));

    let installed: Vec<String> = fixture
        .commands
        .calls()
        .into_iter()
        .filter_map(|call| call.last().cloned())
        .collect();
    assert_eq!(installed, vec!["x".to_string(), "y".to_string()]);
    assert!(!fixture.copied_config().exists());
}

#[tokio::test]
async fn test_install_x_y_where_y_fails_never_copies_config() {
    let fixture = Fixture::new(&["x", "y"], FakeCommandRunner::failing_on("y"));

    let result = fixture.runner.install().await;

    assert!(!result.succeeded);
    assert!(result.message.contains("y"));
    assert!(result.message.contains("No packages available"));
    assert!(!fixture.runner.config().config_dir.exists());
}

#[tokio::test]
async fn test_install_invokes_package_manager_per_package() {
    let fixture = Fixture::new(&["niri", "waybar"], FakeCommandRunner::default());

    let result = fixture.runner.install().await;

    assert!(result.succeeded, "{}", result.message);
    assert_eq!(
        fixture.commands.calls(),
        vec![
            vec!["sudo", "pkg", "install", "-y", "niri"],
            vec!["sudo", "pkg", "install", "-y", "waybar"],
        ]
    );
    assert_eq!(
        fs::read_to_string(fixture.copied_config()).expect("read copy"),
        "input { keyboard {} }\n"
    );
}

#[tokio::test]
async fn test_install_copy_failure_fails_action() {
    let fixture = Fixture::new(&["niri"], FakeCommandRunner::default());
    fs::remove_file(fixture.temp_dir.path().join("config.kdl")).expect("remove source");

    let result = fixture.runner.install().await;

    assert!(!result.succeeded);
    assert!(result.message.contains("config.kdl"));
    assert_eq!(fixture.commands.calls().len(), 1);
}

#[tokio::test]
async fn test_install_with_unstartable_package_manager() {
    let fixture = Fixture::new(
        &["niri", "foot"],
        FakeCommandRunner {
            missing_program: true,
            ..FakeCommandRunner::default()
        },
    );

    let result = fixture.runner.install().await;

    assert!(!result.succeeded);
    assert!(result.message.contains("Failed to install niri"));
    assert_eq!(fixture.commands.calls().len(), 1);
}

#[tokio::test]
async fn test_validate_success_is_inverse_of_non_zero_exit() {
    let passing = Fixture::new(&[], FakeCommandRunner::default());
    let result = passing.runner.validate().await;
    assert!(result.succeeded);
    assert_eq!(result.message, "Niri configuration is valid.");
    assert_eq!(passing.commands.calls(), vec![vec!["niri", "validate"]]);

    let failing = Fixture::new(&[], FakeCommandRunner::failing_on("validate"));
    let result = failing.runner.validate().await;
    assert!(!result.succeeded);
    assert!(result.message.starts_with("Configuration validation failed"));
}

#[tokio::test]
async fn test_configure_returns_fixed_success() {
    let fixture = Fixture::new(&["niri"], FakeCommandRunner::default());

    let result = fixture.runner.run(Fixture::request(Action::Configure)).await;

    assert!(result.succeeded);
    assert_eq!(result.message, "Configuration completed.");
    assert!(fixture.commands.calls().is_empty());
}

#[tokio::test]
async fn test_save_logs_appends_on_every_run() {
    let fixture = Fixture::new(&[], FakeCommandRunner::default());
    let lines = vec!["a".to_string(), "b".to_string()];

    assert!(fixture.runner.save_logs(&lines).await.succeeded);
    assert!(fixture.runner.save_logs(&lines).await.succeeded);

    let content = fs::read_to_string(&fixture.runner.config().log_file).expect("read log");
    assert_eq!(content, "a\nb\na\nb\n");
}

#[tokio::test]
async fn test_save_logs_open_failure() {
    let fixture = Fixture::new(&[], FakeCommandRunner::default());
    fs::remove_dir_all(fixture.temp_dir.path().join("tmp")).expect("remove tmp");

    let result = fixture.runner.save_logs(&["a".to_string()]).await;

    assert!(!result.succeeded);
    assert!(result.message.contains("Failed to open log file"));
}

#[tokio::test]
async fn test_end_to_end_save_logs() {
    let fixture = Fixture::new(&[], FakeCommandRunner::default());
    let mut app = App::new();
    app.note("a");
    app.note("b");

    for _ in 0..3 {
        app.handle_input(Input::Down);
    }
    let request = match app.handle_input(Input::Confirm) {
        Effect::Dispatch(request) => request,
        other => panic!("expected dispatch, got {:?}", other),
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<ActionCompleted>();
    Arc::clone(&fixture.runner)
        .spawn(request, tx)
        .await
        .expect("runner task");
    let done = rx.recv().await.expect("completion event");
    assert!(rx.try_recv().is_err(), "exactly one completion per dispatch");

    let log_file = fixture.runner.config().log_file.clone();
    assert!(done.result.succeeded);
    assert!(done.result.message.contains(&log_file.display().to_string()));
    assert_eq!(fs::read_to_string(&log_file).expect("read log"), "a\nb\n");

    app.complete(done.action, done.result);
    assert_eq!(app.screen(), Screen::Menu);
    assert!(!app.is_processing());
    assert_eq!(app.log().len(), 3);
}

#[tokio::test]
async fn test_end_to_end_failed_install() {
    let fixture = Fixture::new(&["x", "y"], FakeCommandRunner::failing_on("y"));
    let mut app = App::new();

    let request = match app.handle_input(Input::Confirm) {
        Effect::Dispatch(request) => request,
        other => panic!("expected dispatch, got {:?}", other),
    };
    let result = fixture.runner.run(request).await;
    app.complete(Action::Install, result);

    assert_eq!(app.screen(), Screen::Result);
    let shown = app.last_result().expect("result shown");
    assert!(!shown.succeeded);
    assert!(shown.message.contains("y"));
    assert!(!fixture.copied_config().exists());
}
