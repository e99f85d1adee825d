use std::time::Duration;

/// Errors that can occur when executing the Claude CLI headlessly.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time
/// - Setup errors: the prompt file could not be written
/// - Spawn errors: failed to start the CLI or the stdin helper
/// - Runtime errors: the attempt was cut short or the CLI reported failure
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors (detected at build() time)
    // -------------------------------------------------------------------------
    /// Invalid configuration provided to builder.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -------------------------------------------------------------------------
    // Setup errors
    // -------------------------------------------------------------------------
    /// The combined prompt could not be persisted to a temporary file.
    #[error("failed to write prompt file: {0}")]
    PromptFile(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Spawn and streaming errors
    // -------------------------------------------------------------------------
    /// Failed to spawn the claude subprocess.
    #[error("failed to spawn {program} process: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper process feeding the prompt into stdin failed.
    #[error("failed to read prompt file: {message}")]
    StreamFailure { message: String },

    /// IO error while waiting on the claude subprocess.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Runtime errors
    // -------------------------------------------------------------------------
    /// Stdout grew past the configured maximum buffer size.
    #[error("output exceeded max buffer size of {limit} bytes")]
    BufferExceeded { limit: usize },

    /// The process did not finish within the configured timeout and was killed.
    #[error("claude process timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The process was terminated by a signal outside the timeout path.
    #[error("claude process killed by signal: {signal}")]
    Signal { signal: String },

    /// The CLI reported that the account has run out of API credits.
    #[error("Credit balance is too low. Use subscription authentication or add API credits.")]
    CreditBalance,

    /// The process exited with a non-zero code.
    #[error("claude process exited with code {code}\nStderr: {stderr}\nStdout: {stdout}")]
    NonZeroExit {
        code: i32,
        stdout: String,
        stderr: String,
    },
}

/// A specialized Result type for claude-headless operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io(source)
    }

    /// Check if the CLI could not be launched at all.
    pub fn is_spawn_error(&self) -> bool {
        matches!(self, Error::Spawn { .. })
    }

    /// Check if this error came from the timeout path.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// The exit code reported by the CLI, for non-zero exits.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn timeout_message_uses_milliseconds() {
        let err = Error::Timeout(Duration::from_secs(180));
        assert_eq!(err.to_string(), "claude process timed out after 180000ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn non_zero_exit_carries_diagnostics() {
        let err = Error::NonZeroExit {
            code: 2,
            stdout: "partial".into(),
            stderr: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "claude process exited with code 2\nStderr: boom\nStdout: partial"
        );
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn buffer_and_signal_messages() {
        assert_eq!(
            Error::BufferExceeded { limit: 1024 }.to_string(),
            "output exceeded max buffer size of 1024 bytes"
        );
        assert_eq!(
            Error::Signal {
                signal: "SIGKILL".into()
            }
            .to_string(),
            "claude process killed by signal: SIGKILL"
        );
    }

    #[test]
    fn spawn_error_detection() {
        let err = Error::Spawn {
            program: "claude".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_spawn_error());
        assert!(err.to_string().starts_with("failed to spawn claude process"));
        assert!(!Error::CreditBalance.is_spawn_error());
        assert_eq!(Error::CreditBalance.exit_code(), None);
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn question_mark_operator_io() {
        fn fallible_io() -> Result<()> {
            let _file = std::fs::File::open("/nonexistent/path/that/does/not/exist")?;
            Ok(())
        }
        assert!(matches!(fallible_io(), Err(Error::Io(_))));
    }
}
