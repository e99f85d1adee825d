//! Failure classification for a finished attempt.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use nix::sys::signal::Signal;

use crate::protocol::{is_credit_balance_error, ExecutionResult};
use crate::{Error, Result};

/// How the CLI process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Termination {
    pub timed_out: bool,
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl Termination {
    pub(crate) fn from_status(status: ExitStatus, timed_out: bool) -> Self {
        Self {
            timed_out,
            code: status.code(),
            signal: status.signal(),
        }
    }
}

/// Map a finished attempt to its result.
///
/// Precedence: timeout, signal, credit balance, non-zero exit, success.
/// The credit-balance check ignores the exit code.
pub(crate) fn classify(
    termination: Termination,
    stdout: &str,
    stderr: &str,
    timeout: Duration,
) -> Result<ExecutionResult> {
    if termination.timed_out {
        return Err(Error::Timeout(timeout));
    }

    if let Some(signal) = termination.signal {
        return Err(Error::Signal {
            signal: signal_name(signal),
        });
    }

    if is_credit_balance_error(stdout) {
        return Err(Error::CreditBalance);
    }

    match termination.code {
        Some(code) if code != 0 => Err(Error::NonZeroExit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }),
        code => Ok(ExecutionResult::success(stdout, code.unwrap_or(0))),
    }
}

/// `SIGTERM`-style name for a raw signal number.
fn signal_name(signal: i32) -> String {
    Signal::try_from(signal)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {signal}"))
}
