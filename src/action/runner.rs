//! # Action Runner
//!
//! Executes one menu action and folds every outcome into an [`ActionResult`].
//!
//! ## Runners
//!
//! - **Install**: `<install_command> <package>` for each package in order,
//!   stopping at the first failure, then copies the source config into the
//!   per-user config directory.
//! - **Configure**: fixed success.
//! - **Validate**: `<validate_command>`; success is exactly exit code 0.
//! - **Save Logs**: appends the dispatched log snapshot to the log file.
//!
//! Errors never escape a runner. External-command and filesystem failures
//! become `succeeded = false` with the error text as the message, and
//! nothing is retried.

use crate::action::{Action, ActionCompleted, ActionRequest, ActionResult, CommandRunner};
use crate::session;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Everything the runners need from the outside world, resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Packages to install, in order.
    pub packages: Vec<String>,
    /// Install command prefix; the package name is appended.
    pub install_command: Vec<String>,
    /// Validator command line.
    pub validate_command: Vec<String>,
    /// Config file copied during install.
    pub source_config: PathBuf,
    /// Directory the config file is copied into.
    pub config_dir: PathBuf,
    /// Append-only target for Save Logs.
    pub log_file: PathBuf,
}

pub struct ActionRunner {
    config: RunnerConfig,
    commands: Arc<dyn CommandRunner>,
}

impl ActionRunner {
    pub fn new(config: RunnerConfig, commands: Arc<dyn CommandRunner>) -> Self {
        Self { config, commands }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run the requested action to completion.
    pub async fn run(&self, request: ActionRequest) -> ActionResult {
        log::info!("Running action '{}'", request.action.id());

        let result = match request.action {
            Action::Install => self.install().await,
            Action::Configure => self.configure(),
            Action::Validate => self.validate().await,
            Action::SaveLogs => self.save_logs(&request.log_snapshot).await,
            // The controller quits on Exit without dispatching
            Action::Exit => ActionResult::success("Exiting..."),
        };

        if result.succeeded {
            log::info!("Action '{}' succeeded", request.action.id());
        } else {
            log::warn!(
                "Action '{}' failed: {}",
                request.action.id(),
                result.message
            );
        }
        result
    }

    /// Run the request on its own task and send exactly one completion event.
    pub fn spawn(
        self: Arc<Self>,
        request: ActionRequest,
        events: UnboundedSender<ActionCompleted>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let action = request.action;
            let result = self.run(request).await;
            if events.send(ActionCompleted { action, result }).is_err() {
                log::warn!(
                    "Dropped result of '{}': controller is gone",
                    action.id()
                );
            }
        })
    }

    /// Install every package, stopping at the first failure, then copy the
    /// config file into place.
    pub async fn install(&self) -> ActionResult {
        let Some((program, prefix)) = self.config.install_command.split_first() else {
            return ActionResult::failure("Install command is empty");
        };

        let total = self.config.packages.len();
        for (i, package) in self.config.packages.iter().enumerate() {
            log::info!("Installing {} ({}/{})", package, i + 1, total);

            let mut args = prefix.to_vec();
            args.push(package.clone());

            match self.commands.run(program, &args).await {
                Ok(output) if output.success() => {
                    log::info!("Successfully installed {}", package);
                }
                Ok(output) => {
                    return ActionResult::failure(format!(
                        "Failed to install {}: {}",
                        package,
                        output.combined.trim_end()
                    ));
                }
                Err(err) => {
                    return ActionResult::failure(format!(
                        "Failed to install {}: {:#}",
                        package, err
                    ));
                }
            }
        }

        match self.copy_config().await {
            Ok(dest) => {
                log::info!("Copied config to {}", dest.display());
                ActionResult::success(
                    "Niri installation and configuration completed successfully.",
                )
            }
            Err(err) => ActionResult::failure(format!("Configuration copy failed: {:#}", err)),
        }
    }

    async fn copy_config(&self) -> Result<PathBuf> {
        let source = &self.config.source_config;
        let file_name = source
            .file_name()
            .with_context(|| format!("Invalid config path: {}", source.display()))?;
        let dest = self.config.config_dir.join(file_name);

        tokio::fs::create_dir_all(&self.config.config_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create configuration directory: {}",
                    self.config.config_dir.display()
                )
            })?;

        tokio::fs::copy(source, &dest).await.with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source.display(),
                dest.display()
            )
        })?;

        Ok(dest)
    }

    pub fn configure(&self) -> ActionResult {
        ActionResult::success("Configuration completed.")
    }

    pub async fn validate(&self) -> ActionResult {
        let Some((program, args)) = self.config.validate_command.split_first() else {
            return ActionResult::failure("Validate command is empty");
        };

        match self.commands.run(program, args).await {
            Ok(output) if output.success() => ActionResult::success("Niri configuration is valid."),
            Ok(output) => ActionResult::failure(format!(
                "Configuration validation failed: {}",
                output.combined.trim_end()
            )),
            Err(err) => {
                ActionResult::failure(format!("Configuration validation failed: {:#}", err))
            }
        }
    }

    pub async fn save_logs(&self, lines: &[String]) -> ActionResult {
        let path = &self.config.log_file;
        match session::append_lines(path, lines).await {
            Ok(()) => ActionResult::success(format!("Logs saved to {}", path.display())),
            Err(err) => ActionResult::failure(err.to_string()),
        }
    }
}
