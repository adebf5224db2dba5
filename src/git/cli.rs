//! `git config` subprocess calls with a bounded wait.

use super::{BridgeError, ConfigBridge};
use crate::model::types::{Author, Scope};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sleep between `try_wait` polls.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Exit status `git config --get` uses for a missing key.
const GIT_CONFIG_KEY_MISSING: i32 = 1;

/// Runs the git binary for every bridge call.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
    work_dir: Option<PathBuf>,
    timeout: Duration,
}

impl GitCli {
    pub fn new(program: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            work_dir: None,
            timeout,
        }
    }

    /// Run git in `dir` instead of the process working directory.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Spawn git and wait at most `self.timeout` for it. On timeout the child
    /// is killed and reaped before returning.
    fn run(&self, args: &[&str]) -> Result<Output, BridgeError> {
        let start = Instant::now();
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            BridgeError::ExternalTool(format!(
                "failed to run {}: {e}",
                self.program.to_string_lossy()
            ))
        })?;

        let deadline = start + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(?args, timeout_ms = self.timeout.as_millis() as u64, "git timed out");
                    return Err(BridgeError::Timeout {
                        after: self.timeout,
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(BridgeError::ExternalTool(format!("git: {e}"))),
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BridgeError::ExternalTool(format!("git: {e}")))?;
        debug!(
            ?args,
            status = ?output.status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "git finished"
        );
        Ok(output)
    }

    fn failure(output: &Output) -> BridgeError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        BridgeError::ExternalTool(format!("git: {}: {}", output.status, stderr.trim()))
    }

    fn get_key(&self, scope: Scope, key: &str) -> Result<Option<String>, BridgeError> {
        let output = self.run(&["config", scope.git_flag(), "--get", key])?;
        if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok((!value.is_empty()).then_some(value));
        }
        if output.status.code() == Some(GIT_CONFIG_KEY_MISSING) {
            return Ok(None);
        }
        Err(Self::failure(&output))
    }

    fn set_key(&self, scope: Scope, key: &str, value: &str) -> Result<(), BridgeError> {
        let output = self.run(&["config", scope.git_flag(), key, value])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Self::failure(&output))
        }
    }
}

impl ConfigBridge for GitCli {
    fn is_inside_tracked_workspace(&self) -> bool {
        match self.run(&["rev-parse", "--is-inside-work-tree"]) {
            Ok(output) => {
                output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
            }
            Err(err) => {
                debug!(error = %err, "work tree probe failed");
                false
            }
        }
    }

    fn read_author(&self, scope: Scope) -> Result<Author, BridgeError> {
        if scope == Scope::Local && !self.is_inside_tracked_workspace() {
            return Err(BridgeError::NotTrackedWorkspace);
        }
        let name = self.get_key(scope, "user.name")?;
        let email = self.get_key(scope, "user.email")?;
        match (name, email) {
            (Some(name), Some(email)) => Ok(Author { name, email }),
            _ => Err(BridgeError::NotConfigured(scope)),
        }
    }

    fn write_author(&self, scope: Scope, name: &str, email: &str) -> Result<(), BridgeError> {
        self.set_key(scope, "user.name", name)?;
        self.set_key(scope, "user.email", email)?;
        info!(%scope, name, email, "git author written");
        Ok(())
    }
}
