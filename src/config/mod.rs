//! Configuration for headless Claude CLI execution.
//!
//! This module provides:
//!
//! - [`ExecutionConfig`] and [`ExecutionConfigBuilder`] for configuring an executor
//! - [`ExecutionOptions`], the serde form of the public options object
//! - [`OutputFormat`] for the CLI's `--output-format` flag
//! - Credential handling for subscription mode in [`auth`]
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use claude_headless::config::{ExecutionConfig, OutputFormat};
//!
//! let config = ExecutionConfig::builder()
//!     .output_format(OutputFormat::StreamJson)
//!     .timeout(Duration::from_secs(300))
//!     .max_buffer(1024 * 1024)
//!     .retries(2)
//!     .build()?;
//! ```

pub mod auth;
pub mod builder;
pub mod options;

pub use auth::{subscription_settings, ENV_API_KEY};
pub use builder::{ExecutionConfig, ExecutionConfigBuilder, DEFAULT_BACKOFF_STEP};
pub use options::{ExecutionOptions, OutputFormat, DEFAULT_MAX_BUFFER, DEFAULT_TIMEOUT};
