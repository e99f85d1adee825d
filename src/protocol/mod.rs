//! Data exchanged with callers and with the Claude CLI.
//!
//! - [`ExecutionInput`]: system and user prompts, combined into one document
//! - [`ExecutionResult`]: trimmed stdout and exit code of a successful run
//! - [`CliResult`]: typed view of the CLI's final JSON result object
//!
//! # Example
//!
//! ```
//! use claude_headless::protocol::{ExecutionInput, ExecutionResult};
//!
//! let input = ExecutionInput::new("You are terse.", "What is 2+2?");
//! assert_eq!(input.combined(), "You are terse.\n\n---\n\nWhat is 2+2?");
//!
//! let output = ExecutionResult::success(r#"{"type":"result","result":"4"}"#, 0);
//! assert_eq!(output.cli_result().unwrap().result.as_deref(), Some("4"));
//! ```

mod messages;
mod result;

pub use messages::{ExecutionInput, ExecutionResult, PROMPT_SEPARATOR};
pub use result::{is_credit_balance_error, CliResult, CREDIT_BALANCE_MARKER};
