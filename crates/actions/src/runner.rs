//! Runs setup scripts from the actions directory.
//!
//! Unprivileged actions are executed directly; privileged ones are prefixed
//! with the configured superuser command (`sudo -n` by default). Callers wait
//! for the process to exit, there is no timeout.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use {
    async_trait::async_trait,
    boxpanel_config::ActionsConfig,
    tracing::{debug, warn},
};

use crate::error::{Context, Error, Result};

// ── Types ────────────────────────────────────────────────────────────────────

/// Captured result of an action.
///
/// `error` is `Some` when the script exited non-zero or wrote to stderr.
/// Callers treat any `error` as fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput {
    pub output: String,
    pub error: Option<String>,
}

impl ActionOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: Some(error.into()),
        }
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ActionRunner: Send + Sync {
    /// Run `action` with the caller's privileges.
    async fn run(&self, action: &str, args: &[&str]) -> Result<ActionOutput>;
    /// Run `action` through the superuser command.
    async fn superuser_run(&self, action: &str, args: &[&str]) -> Result<ActionOutput>;
}

// ── CLI-based implementation ─────────────────────────────────────────────────

/// Spawns scripts found in a single actions directory.
#[derive(Debug, Clone)]
pub struct CliActionRunner {
    actions_dir: PathBuf,
    superuser_command: Vec<String>,
}

impl CliActionRunner {
    pub fn new(actions_dir: impl Into<PathBuf>, superuser_command: Vec<String>) -> Self {
        Self {
            actions_dir: actions_dir.into(),
            superuser_command,
        }
    }

    pub fn from_config(config: &ActionsConfig) -> Self {
        Self::new(config.dir.clone(), config.superuser_command.clone())
    }

    fn action_path(&self, action: &str) -> Result<PathBuf> {
        validate_action_name(action)?;
        Ok(self.actions_dir.join(action))
    }

    async fn execute(
        &self,
        action: &str,
        program: &Path,
        args: Vec<String>,
        log_args: bool,
    ) -> Result<ActionOutput> {
        if log_args {
            debug!(action, program = %program.display(), ?args, "running action");
        } else {
            debug!(action, program = %program.display(), "running privileged action");
        }

        let out = tokio::process::Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("failed to run action {action}"))?;

        let output = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();

        let error = if !out.status.success() {
            Some(if stderr.is_empty() {
                format!("{action} exited with {}", out.status)
            } else {
                stderr
            })
        } else if !stderr.is_empty() {
            Some(stderr)
        } else {
            None
        };

        if let Some(ref err) = error {
            warn!(action, exit_code = ?out.status.code(), error = %err, "action failed");
        }

        Ok(ActionOutput { output, error })
    }
}

#[async_trait]
impl ActionRunner for CliActionRunner {
    async fn run(&self, action: &str, args: &[&str]) -> Result<ActionOutput> {
        let path = self.action_path(action)?;
        let args = args.iter().map(|a| (*a).to_owned()).collect();
        self.execute(action, &path, args, true).await
    }

    async fn superuser_run(&self, action: &str, args: &[&str]) -> Result<ActionOutput> {
        let path = self.action_path(action)?;
        let Some((program, prefix)) = self.superuser_command.split_first() else {
            return Err(Error::NoSuperuserCommand {
                action: action.to_owned(),
            });
        };

        let mut full_args: Vec<String> = prefix.to_vec();
        full_args.push(path.to_string_lossy().into_owned());
        full_args.extend(args.iter().map(|a| (*a).to_owned()));

        self.execute(action, Path::new(program), full_args, false)
            .await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Action names are plain file names inside the actions directory.
fn validate_action_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidAction {
            name: name.to_owned(),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn write_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn action_names() {
        assert!(validate_action_name("xmpp-setup").is_ok());
        assert!(validate_action_name("xmpp_register.sh").is_ok());
        assert!(validate_action_name("").is_err());
        assert!(validate_action_name("..").is_err());
        assert!(validate_action_name("../bin/sh").is_err());
        assert!(validate_action_name("a/b").is_err());
        assert!(validate_action_name("a b").is_err());
    }

    #[tokio::test]
    async fn captures_stdout_and_args() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "echo-args", "echo \"got $1 $2\"");
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);

        let out = runner.run("echo-args", &["a", "b"]).await.unwrap();
        assert_eq!(out.output, "got a b\n");
        assert_eq!(out.error, None);
    }

    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "fail", "echo boom >&2\nexit 3");
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);

        let out = runner.run("fail", &[]).await.unwrap();
        assert_eq!(out.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn nonzero_exit_without_stderr_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "quiet-fail", "exit 2");
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);

        let out = runner.run("quiet-fail", &[]).await.unwrap();
        assert!(out.error.unwrap().starts_with("quiet-fail exited with"));
    }

    #[tokio::test]
    async fn stderr_on_success_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "noisy", "echo ok\necho warning >&2");
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);

        let out = runner.run("noisy", &[]).await.unwrap();
        assert_eq!(out.output, "ok\n");
        assert_eq!(out.error.as_deref(), Some("warning"));
    }

    #[tokio::test]
    async fn superuser_run_goes_through_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "whoami-args", "echo \"$@\"");
        // `env` stands in for sudo: it just execs the rest of the command line.
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);

        let out = runner
            .superuser_run("whoami-args", &["inband_enable"])
            .await
            .unwrap();
        assert_eq!(out.output.trim(), "inband_enable");
    }

    #[tokio::test]
    async fn superuser_run_without_prefix_fails() {
        let dir = tempfile::tempdir().unwrap();
        let runner = CliActionRunner::new(dir.path(), Vec::new());
        let err = runner.superuser_run("xmpp-setup", &[]).await.unwrap_err();
        assert!(matches!(err, Error::NoSuperuserCommand { .. }));
    }

    #[tokio::test]
    async fn missing_script_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = CliActionRunner::new(dir.path(), vec!["env".into()]);
        let err = runner.run("xmpp-setup", &["status"]).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to run action xmpp-setup"));
    }
}
