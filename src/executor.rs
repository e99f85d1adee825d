//! Retrying executor for headless Claude CLI runs.
//!
//! This module provides [`Executor`], the main entry point for running a
//! prompt through the Claude CLI.
//!
//! # Example
//!
//! ```ignore
//! use claude_headless::{ExecutionInput, Executor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let executor = Executor::builder().retries(2).build()?;
//!     let output = executor
//!         .execute(&ExecutionInput::new("You are terse.", "What is 2+2?"))
//!         .await?;
//!     println!("{}", output.result);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ExecutionConfig, ExecutionConfigBuilder, ExecutionOptions, OutputFormat};
use crate::process::ProcessRunner;
use crate::protocol::{ExecutionInput, ExecutionResult};
use crate::Result;

/// Runs prompts through the Claude CLI, retrying failed attempts.
///
/// Attempt `k` that fails is followed by a pause of `k * backoff_step`
/// (1s, 2s, 3s, ... by default) as long as retries remain. When every
/// attempt fails, the last attempt's error is returned.
///
/// # Thread Safety
///
/// `Executor` is `Send + Sync` and cheap to clone. Each call gets its own
/// CLI process and prompt file, so concurrent calls do not interfere.
#[derive(Debug, Clone)]
pub struct Executor {
    config: Arc<ExecutionConfig>,
    runner: ProcessRunner,
}

impl Executor {
    /// Create an executor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ExecutionConfig::default())
    }

    /// Create an executor with the given configuration.
    pub fn with_config(config: ExecutionConfig) -> Self {
        let config = Arc::new(config);
        Self {
            runner: ProcessRunner::new(Arc::clone(&config)),
            config,
        }
    }

    /// Create an executor from the public options object.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn from_options(options: ExecutionOptions) -> Result<Self> {
        Ok(Self::with_config(options.into_config()?))
    }

    /// Create a builder for configuring a new executor.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    /// Run `input` through the CLI, retrying up to the configured count.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let output = executor.execute(&ExecutionInput::new("system", "user")).await?;
    /// assert_eq!(output.exit_code, Some(0));
    /// ```
    pub async fn execute(&self, input: &ExecutionInput) -> Result<ExecutionResult> {
        let attempts = self.config.retries().saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(attempt, attempts, "starting claude attempt");

            match self.runner.run(input).await {
                Ok(result) => return Ok(result),
                Err(err) if attempt < attempts => {
                    let delay = backoff_delay(self.config.backoff_step(), attempt);
                    tracing::warn!(
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Get a reference to the executor's configuration.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Pause after failed attempt `attempt` (1-based): linear, no jitter, no cap.
pub(crate) fn backoff_delay(step: Duration, attempt: u32) -> Duration {
    step.saturating_mul(attempt)
}

/// Builder for [`Executor`].
///
/// This wraps [`ExecutionConfigBuilder`] and builds directly into an [`Executor`].
///
/// # Example
///
/// ```ignore
/// let executor = Executor::builder()
///     .output_format(OutputFormat::Text)
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutorBuilder {
    inner: ExecutionConfigBuilder,
}

impl ExecutorBuilder {
    /// Create a new executor builder with default settings.
    pub fn new() -> Self {
        Self {
            inner: ExecutionConfigBuilder::default(),
        }
    }

    /// Build the executor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (e.g., zero timeout).
    pub fn build(self) -> Result<Executor> {
        let config = self.inner.build()?;
        Ok(Executor::with_config(config))
    }

    // -------------------------------------------------------------------------
    // Core options (delegated to ExecutionConfigBuilder)
    // -------------------------------------------------------------------------

    /// Set the CLI output format.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.inner = self.inner.output_format(format);
        self
    }

    /// Timeout for a single attempt.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.inner = self.inner.timeout(duration);
        self
    }

    /// Maximum stdout size in bytes.
    pub fn max_buffer(mut self, bytes: usize) -> Self {
        self.inner = self.inner.max_buffer(bytes);
        self
    }

    /// Use subscription auth instead of API billing.
    pub fn use_subscription(mut self, enabled: bool) -> Self {
        self.inner = self.inner.use_subscription(enabled);
        self
    }

    /// Number of retries after the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.inner = self.inner.retries(retries);
        self
    }

    /// Unit of the linear backoff.
    pub fn backoff_step(mut self, step: Duration) -> Self {
        self.inner = self.inner.backoff_step(step);
        self
    }

    // -------------------------------------------------------------------------
    // Process options
    // -------------------------------------------------------------------------

    /// Path to claude CLI binary.
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.cli_path(path);
        self
    }

    /// Working directory for claude process.
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.working_directory(path);
        self
    }

    /// Directory for prompt files.
    pub fn prompt_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.prompt_dir(path);
        self
    }

    /// Add/override environment variable for subprocess.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.env(key, value);
        self
    }

    /// Apply a public options object on top of the current settings.
    pub fn options(mut self, options: &ExecutionOptions) -> Self {
        self.inner = options.apply(self.inner);
        self
    }
}
