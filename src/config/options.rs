//! Type-safe configuration options for the Claude CLI.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::builder::{ExecutionConfig, ExecutionConfigBuilder};
use crate::{Error, Result};

/// Default timeout for one attempt (3 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(180_000);
/// Default maximum stdout size (10 MiB).
pub const DEFAULT_MAX_BUFFER: usize = 10 * 1024 * 1024;

/// Output format requested from the CLI via `--output-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Plain text.
    Text,
    /// A single JSON result object.
    #[default]
    Json,
    /// Newline-delimited JSON events.
    StreamJson,
}

impl OutputFormat {
    /// The flag value understood by the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::StreamJson => "stream-json",
        }
    }

    /// Whether stdout is made of JSON documents.
    pub fn is_json(&self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "stream-json" | "stream_json" => Ok(OutputFormat::StreamJson),
            other => Err(Error::InvalidConfig(format!(
                "unknown output format: {other} (expected text, json or stream-json)"
            ))),
        }
    }
}

/// The options object accepted by the public entry point.
///
/// Every field is optional. Missing or zero numeric values fall back to the
/// defaults, and `useSubscription` defaults to `true`.
///
/// ```ignore
/// let options: ExecutionOptions = serde_json::from_str(r#"{"timeout": 60000, "retries": 2}"#)?;
/// let config = options.into_config()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    /// Output format (default `json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    /// Timeout in milliseconds (default 180000).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Maximum stdout size in bytes (default 10 MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffer: Option<usize>,
    /// Strip the API key so the CLI falls back to subscription auth (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_subscription: Option<bool>,
    /// Number of retries after the first attempt (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl ExecutionOptions {
    /// Apply these options on top of a builder.
    pub fn apply(&self, mut builder: ExecutionConfigBuilder) -> ExecutionConfigBuilder {
        if let Some(format) = self.output_format {
            builder = builder.output_format(format);
        }
        if let Some(ms) = self.timeout.filter(|ms| *ms > 0) {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(bytes) = self.max_buffer.filter(|b| *b > 0) {
            builder = builder.max_buffer(bytes);
        }
        if let Some(subscription) = self.use_subscription {
            builder = builder.use_subscription(subscription);
        }
        if let Some(retries) = self.retries {
            builder = builder.retries(retries);
        }
        builder
    }

    /// Build a validated configuration from these options.
    pub fn into_config(self) -> Result<ExecutionConfig> {
        self.apply(ExecutionConfig::builder()).build()
    }
}
