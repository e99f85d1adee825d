//! Execution configuration and builder.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use claude_headless::config::{ExecutionConfig, OutputFormat};
//!
//! let config = ExecutionConfig::builder()
//!     .output_format(OutputFormat::Text)
//!     .timeout(Duration::from_secs(60))
//!     .retries(2)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::auth::CredentialMode;
use super::options::{OutputFormat, DEFAULT_MAX_BUFFER, DEFAULT_TIMEOUT};
use crate::{Error, Result};

/// Default unit of the linear retry backoff.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1000);

/// Configuration for one [`Executor`](crate::Executor).
///
/// Immutable once built. Use [`ExecutionConfig::builder()`] to create one.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    // Core options
    pub(crate) output_format: OutputFormat,
    pub(crate) timeout: Duration,
    pub(crate) max_buffer: usize,
    pub(crate) use_subscription: bool,
    pub(crate) retries: u32,
    pub(crate) backoff_step: Duration,

    // Process options
    pub(crate) cli_path: Option<PathBuf>,
    pub(crate) working_directory: Option<PathBuf>,
    pub(crate) prompt_dir: Option<PathBuf>,
    pub(crate) env_vars: HashMap<String, String>,
}

impl ExecutionConfig {
    /// Create a new builder for ExecutionConfig.
    pub fn builder() -> ExecutionConfigBuilder {
        ExecutionConfigBuilder::default()
    }

    /// Get the output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Get the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the maximum stdout size in bytes.
    pub fn max_buffer(&self) -> usize {
        self.max_buffer
    }

    /// Whether the API key is stripped in favor of subscription auth.
    pub fn use_subscription(&self) -> bool {
        self.use_subscription
    }

    /// Get the number of retries after the first attempt.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Get the backoff unit; attempt `k` waits `k * backoff_step`.
    pub fn backoff_step(&self) -> Duration {
        self.backoff_step
    }

    /// Get the working directory if set.
    pub fn working_directory(&self) -> Option<&PathBuf> {
        self.working_directory.as_ref()
    }

    /// Directory prompt files are written to.
    pub fn prompt_dir(&self) -> PathBuf {
        self.prompt_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Get the CLI path, or default to "claude".
    pub(crate) fn cli_command(&self) -> &Path {
        self.cli_path
            .as_deref()
            .unwrap_or_else(|| Path::new("claude"))
    }

    pub(crate) fn credential_mode(&self) -> CredentialMode {
        CredentialMode::from_subscription(self.use_subscription)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfigBuilder::default().into_config()
    }
}

/// Builder for [`ExecutionConfig`].
///
/// Validation happens in [`build()`](ExecutionConfigBuilder::build).
#[derive(Debug, Clone)]
pub struct ExecutionConfigBuilder {
    output_format: OutputFormat,
    timeout: Duration,
    max_buffer: usize,
    use_subscription: bool,
    retries: u32,
    backoff_step: Duration,

    cli_path: Option<PathBuf>,
    working_directory: Option<PathBuf>,
    prompt_dir: Option<PathBuf>,
    env_vars: HashMap<String, String>,
}

impl Default for ExecutionConfigBuilder {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            timeout: DEFAULT_TIMEOUT,
            max_buffer: DEFAULT_MAX_BUFFER,
            use_subscription: true,
            retries: 0,
            backoff_step: DEFAULT_BACKOFF_STEP,
            cli_path: None,
            working_directory: None,
            prompt_dir: None,
            env_vars: HashMap::new(),
        }
    }
}

impl ExecutionConfigBuilder {
    // -------------------------------------------------------------------------
    // Core options
    // -------------------------------------------------------------------------

    /// Set the `--output-format` passed to the CLI.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Timeout for a single attempt.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Maximum stdout size in bytes before the process is terminated.
    pub fn max_buffer(mut self, bytes: usize) -> Self {
        self.max_buffer = bytes;
        self
    }

    /// Use the subscription login instead of API billing (default: true).
    pub fn use_subscription(mut self, enabled: bool) -> Self {
        self.use_subscription = enabled;
        self
    }

    /// Number of retries after the first attempt (default: 0).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Unit of the linear backoff between attempts (default: 1s).
    pub fn backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    // -------------------------------------------------------------------------
    // Process options
    // -------------------------------------------------------------------------

    /// Path to claude CLI binary (default: search PATH for "claude").
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    /// Working directory for claude process.
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(path.into());
        self
    }

    /// Directory for prompt files (default: the platform temp dir).
    pub fn prompt_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(path.into());
        self
    }

    /// Add/override environment variable for subprocess.
    ///
    /// Subscription mode still removes the API key, even if it is set here.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    /// Build the configuration.
    ///
    /// This validates:
    /// - Timeout and max buffer are non-zero
    /// - Working and prompt directories exist if specified
    ///
    /// Note: CLI existence is checked lazily at spawn time.
    pub fn build(self) -> Result<ExecutionConfig> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be non-zero".into()));
        }

        if self.max_buffer == 0 {
            return Err(Error::InvalidConfig("max_buffer must be non-zero".into()));
        }

        if let Some(ref dir) = self.working_directory {
            if !dir.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "working directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        if let Some(ref dir) = self.prompt_dir {
            if !dir.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "prompt directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        Ok(self.into_config())
    }

    fn into_config(self) -> ExecutionConfig {
        ExecutionConfig {
            output_format: self.output_format,
            timeout: self.timeout,
            max_buffer: self.max_buffer,
            use_subscription: self.use_subscription,
            retries: self.retries,
            backoff_step: self.backoff_step,
            cli_path: self.cli_path,
            working_directory: self.working_directory,
            prompt_dir: self.prompt_dir,
            env_vars: self.env_vars,
        }
    }
}
