//! # claude-headless
//!
//! Managed headless execution of the Claude Code CLI.
//!
//! Each call writes the prompt to a temporary file, streams it into
//! `claude -p` through a helper process, and collects the output under a
//! timeout and a stdout size limit. Failures are classified (spawn, stream,
//! buffer, timeout, signal, credit balance, non-zero exit) and optionally
//! retried with linear backoff.
//!
//! ## Quick Start
//!
//! ```ignore
//! use claude_headless::{ExecutionInput, Executor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let executor = Executor::new();
//!     let output = executor
//!         .execute(&ExecutionInput::new("You are a calculator.", "What is 2+2?"))
//!         .await?;
//!     println!("{}", output.result);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! use std::time::Duration;
//! use claude_headless::{Executor, OutputFormat};
//!
//! let executor = Executor::builder()
//!     .output_format(OutputFormat::Text)
//!     .timeout(Duration::from_secs(60))
//!     .max_buffer(1024 * 1024)
//!     .use_subscription(true)
//!     .retries(2)
//!     .build()?;
//! ```
//!
//! The same options can be given as the JSON object used by other
//! integrations:
//!
//! ```ignore
//! use claude_headless::{ExecutionOptions, Executor};
//!
//! let options: ExecutionOptions =
//!     serde_json::from_str(r#"{"outputFormat":"json","timeout":60000,"retries":1}"#)?;
//! let executor = Executor::from_options(options)?;
//! ```
//!
//! ## Platform
//!
//! Unix only: termination uses SIGTERM/SIGKILL and the prompt is streamed
//! with `cat`.

pub mod config;
mod error;
mod executor;
mod node;
pub mod process;
pub mod protocol;

pub use error::{Error, Result};

// Re-export the main executor types at crate root
pub use executor::{Executor, ExecutorBuilder};
pub use node::HeadlessNode;

// Re-export commonly used config types at crate root
pub use config::{ExecutionConfig, ExecutionConfigBuilder, ExecutionOptions, OutputFormat};

// Re-export commonly used protocol types at crate root
pub use protocol::{CliResult, ExecutionInput, ExecutionResult};

// Re-export commonly used process types at crate root
pub use process::ProcessRunner;
