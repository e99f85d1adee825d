//! Process spawning and signalling.

use std::path::Path;
use std::process::Stdio;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use super::{KILL_GRACE, STREAM_HELPER};
use crate::config::ExecutionConfig;
use crate::{Error, Result};

/// Spawn the Claude CLI with all three stdio streams piped.
pub(crate) fn spawn_cli(config: &ExecutionConfig) -> Result<Child> {
    let program = config.cli_command().display().to_string();
    let child = build_command(config)
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

    tracing::debug!(
        pid = child.id(),
        program = %program,
        output_format = %config.output_format(),
        subscription = config.use_subscription(),
        "spawned claude process"
    );
    Ok(child)
}

/// Spawn the helper that writes the prompt file to its stdout.
pub(crate) fn spawn_stream_helper(prompt_path: &Path) -> Result<Child> {
    Command::new(STREAM_HELPER)
        .arg(prompt_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::StreamFailure {
            message: format!("failed to spawn {STREAM_HELPER}: {e}"),
        })
}

/// Build a tokio Command from the config.
fn build_command(config: &ExecutionConfig) -> Command {
    let mut cmd = Command::new(config.cli_command());

    if let Some(dir) = config.working_directory() {
        cmd.current_dir(dir);
    }

    // The parent environment is inherited; extras first, then strip credentials
    for (key, value) in &config.env_vars {
        cmd.env(key, value);
    }
    for key in config.credential_mode().stripped_env() {
        cmd.env_remove(key);
    }

    cmd.args(build_args(config));
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    cmd
}

/// Build CLI arguments (prompt is sent via stdin, not as argument).
fn build_args(config: &ExecutionConfig) -> Vec<String> {
    let mut args = vec![
        "-p".to_string(),
        "--output-format".to_string(),
        config.output_format().to_string(),
    ];

    if let Some(settings) = config.credential_mode().settings_arg() {
        args.push("--settings".to_string());
        args.push(settings);
    }

    args
}

/// Send `signal` to a child that has not been reaped yet.
///
/// `pid` comes from [`Child::id`], which is `None` once the exit status has
/// been collected, so a recycled pid is never signalled.
pub(crate) fn send_signal(pid: Option<u32>, signal: Signal) -> bool {
    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return false;
    };

    match signal::kill(Pid::from_raw(pid), signal) {
        Ok(()) => true,
        Err(errno) => {
            tracing::debug!(pid, signal = %signal, error = %errno, "failed to signal process");
            false
        }
    }
}

/// Send SIGTERM now and SIGKILL after [`KILL_GRACE`] if the child is still
/// running. The child is reaped in the background.
pub(crate) fn terminate_gracefully(mut child: Child) {
    if !send_signal(child.id(), Signal::SIGTERM) {
        return;
    }

    tokio::spawn(async move {
        if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
            tracing::warn!(
                pid = child.id(),
                "claude process ignored SIGTERM; sending SIGKILL"
            );
            if let Err(e) = child.kill().await {
                tracing::debug!(error = %e, "failed to kill claude process");
            }
        }
    });
}
