//! Input and output types of a headless execution.

use serde::{Deserialize, Serialize};

use super::result::CliResult;

/// Separator placed between the system and user prompts.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// The two prompts sent to the CLI in one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInput {
    /// Instructions that frame the task.
    pub system_prompt: String,
    /// The user content to act on.
    pub user_prompt: String,
}

impl ExecutionInput {
    /// Create an input from its two prompts.
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    /// The single document streamed into the CLI's stdin.
    pub fn combined(&self) -> String {
        format!("{}{}{}", self.system_prompt, PROMPT_SEPARATOR, self.user_prompt)
    }
}

/// Result of a successful execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Captured stdout, trimmed.
    pub result: String,
    /// Error text, if any. Never set by a successful attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Process exit code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// Build a success result from raw stdout.
    pub fn success(stdout: &str, exit_code: i32) -> Self {
        Self {
            result: stdout.trim().to_string(),
            error: None,
            exit_code: Some(exit_code),
        }
    }

    /// Parse the CLI's final JSON result object out of the captured output.
    ///
    /// Returns `None` for text output or when no result object is present.
    pub fn cli_result(&self) -> Option<CliResult> {
        CliResult::parse(&self.result)
    }
}
