//! # External Commands
//!
//! The package manager and the config validator are opaque external tools.
//! Both are reached through the [`CommandRunner`] trait so the install and
//! validate runners can be exercised without touching the system.
//!
//! ## Contract
//!
//! - Exit status 0 is success, anything else (including death by signal) is
//!   failure.
//! - stdout and stderr are captured and joined into one `combined` string,
//!   which becomes the failure detail shown to the user.
//! - stdin is closed; the TUI owns the terminal while a command runs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// stdout followed by stderr, lossily decoded.
    pub combined: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a program with arguments and captures its output.
///
/// An `Err` means the program could not be started at all; a program that
/// starts and exits non-zero is an `Ok` with a failing [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        log::debug!("Running `{} {}`", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to execute '{}'", program))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        log::debug!("`{}` exited with {:?}", program, output.status.code());

        Ok(CommandOutput {
            code: output.status.code(),
            combined,
        })
    }
}
