//! A single attempt: spawn, stream, collect, resolve.

use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;

use nix::sys::signal::Signal;
use tokio::io::AsyncReadExt;
use tokio::time::{sleep, Instant};

use super::io::{feed_stdin, AttemptState, PromptFile};
use super::outcome::{classify, Termination};
use super::spawn::{send_signal, spawn_cli, spawn_stream_helper, terminate_gracefully};
use super::{KILL_GRACE, PIPE_DRAIN_GRACE, READ_CHUNK};
use crate::config::ExecutionConfig;
use crate::protocol::{ExecutionInput, ExecutionResult};
use crate::{Error, Result};

/// Runs one attempt of the Claude CLI under the configured limits.
///
/// Every call owns its own prompt file and [`AttemptState`], so a runner can
/// be shared between concurrent callers.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    config: Arc<ExecutionConfig>,
}

impl ProcessRunner {
    /// Create a runner over a shared configuration.
    pub fn new(config: Arc<ExecutionConfig>) -> Self {
        Self { config }
    }

    /// Get a reference to the runner's configuration.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Run the CLI once with `input` as its prompt.
    ///
    /// The prompt file is removed before this returns, on every path.
    pub async fn run(&self, input: &ExecutionInput) -> Result<ExecutionResult> {
        let prompt = PromptFile::create(&self.config.prompt_dir(), &input.combined())?;
        let outcome = self.run_with_prompt(prompt.path()).await;
        prompt.remove();
        outcome
    }

    async fn run_with_prompt(&self, prompt_path: &Path) -> Result<ExecutionResult> {
        let timeout = self.config.timeout();
        let mut child = spawn_cli(&self.config)?;

        let (stdin, mut stdout, mut stderr) =
            match (child.stdin.take(), child.stdout.take(), child.stderr.take()) {
                (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
                _ => {
                    terminate_gracefully(child);
                    return Err(Error::io(std::io::Error::other(
                        "claude stdio was not captured",
                    )));
                }
            };

        let helper = match spawn_stream_helper(prompt_path) {
            Ok(helper) => helper,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "failed to start prompt stream; terminating claude process"
                );
                terminate_gracefully(child);
                return Err(err);
            }
        };
        let feeder = feed_stdin(helper, stdin);
        tokio::pin!(feeder);

        let mut state = AttemptState::new(self.config.max_buffer());
        let mut out_buf = vec![0u8; READ_CHUNK];
        let mut err_buf = vec![0u8; READ_CHUNK];
        let mut stdout_open = true;
        let mut stderr_open = true;
        let mut feeding = true;
        let mut exit_status: Option<ExitStatus> = None;

        let deadline = sleep(timeout);
        let kill_at = sleep(KILL_GRACE);
        let drain_until = sleep(PIPE_DRAIN_GRACE);
        tokio::pin!(deadline, kill_at, drain_until);

        let status = loop {
            // An exited child still waits on the feeder for the helper's status
            if let Some(status) = exit_status {
                if !stdout_open && !stderr_open && !feeding {
                    break status;
                }
            }

            tokio::select! {
                read = stdout.read(&mut out_buf), if stdout_open => match read {
                    Ok(0) => stdout_open = false,
                    Ok(n) => {
                        if let Err(err) = state.push_stdout(&out_buf[..n]) {
                            tracing::warn!(
                                limit = self.config.max_buffer(),
                                received = state.stdout_len(),
                                "claude output exceeded max buffer; terminating process"
                            );
                            state.mark_killed();
                            if exit_status.is_none() {
                                terminate_gracefully(child);
                            }
                            return Err(err);
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to read claude stdout");
                        stdout_open = false;
                    }
                },

                read = stderr.read(&mut err_buf), if stderr_open => match read {
                    Ok(0) => stderr_open = false,
                    Ok(n) => state.push_stderr(&err_buf[..n]),
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to read claude stderr");
                        stderr_open = false;
                    }
                },

                status = child.wait(), if exit_status.is_none() => {
                    exit_status = Some(status.map_err(Error::io)?);
                    drain_until.as_mut().reset(Instant::now() + PIPE_DRAIN_GRACE);
                }

                fed = &mut feeder, if feeding => {
                    feeding = false;
                    if let Err(err) = fed {
                        tracing::warn!(
                            error = %err,
                            "prompt stream failed; terminating claude process"
                        );
                        if exit_status.is_none() {
                            terminate_gracefully(child);
                        }
                        return Err(err);
                    }
                }

                _ = &mut deadline, if exit_status.is_none() && !state.timed_out() => {
                    tracing::warn!(
                        timeout_ms = timeout.as_millis() as u64,
                        "claude process timed out; sending SIGTERM"
                    );
                    state.mark_timed_out();
                    send_signal(child.id(), Signal::SIGTERM);
                    kill_at.as_mut().reset(Instant::now() + KILL_GRACE);
                }

                _ = &mut kill_at, if state.timed_out() && !state.killed() && exit_status.is_none() => {
                    tracing::warn!(
                        grace_ms = KILL_GRACE.as_millis() as u64,
                        "claude process still running after SIGTERM; sending SIGKILL"
                    );
                    state.mark_killed();
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(error = %e, "failed to kill claude process");
                    }
                }

                _ = &mut drain_until, if exit_status.is_some() => {
                    tracing::debug!(
                        feeding,
                        "claude pipes still open after exit; resolving without them"
                    );
                    stdout_open = false;
                    stderr_open = false;
                    feeding = false;
                }
            }
        };

        let termination = Termination::from_status(status, state.timed_out());
        tracing::debug!(
            code = termination.code,
            signal = termination.signal,
            timed_out = termination.timed_out,
            stdout_bytes = state.stdout_len(),
            "claude process closed"
        );

        classify(
            termination,
            &state.stdout_text(),
            &state.stderr_text(),
            timeout,
        )
    }
}
