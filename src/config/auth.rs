//! Credential handling for the Claude CLI subprocess.
//!
//! The CLI bills per call when `ANTHROPIC_API_KEY` is visible to it. In
//! subscription mode the key is removed from the child environment and the
//! CLI is additionally told, through `--settings`, to treat it as empty, so
//! it falls back to the logged-in subscription.
//!
//! # Example
//!
//! ```ignore
//! use claude_headless::config::auth::{subscription_settings, ENV_API_KEY};
//!
//! assert_eq!(subscription_settings()["env"][ENV_API_KEY], "");
//! ```

use serde_json::{json, Value};

/// Environment variable name for API key.
pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Settings payload passed via `--settings` in subscription mode.
pub fn subscription_settings() -> Value {
    json!({
        "env": {
            ENV_API_KEY: "",
        }
    })
}

/// How the child process authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CredentialMode {
    /// Strip the API key; the CLI uses the subscription login.
    Subscription,
    /// Leave the inherited environment untouched.
    ApiKey,
}

impl CredentialMode {
    pub(crate) fn from_subscription(use_subscription: bool) -> Self {
        if use_subscription {
            CredentialMode::Subscription
        } else {
            CredentialMode::ApiKey
        }
    }

    /// Environment variables to remove from the child.
    pub(crate) fn stripped_env(&self) -> &'static [&'static str] {
        match self {
            CredentialMode::Subscription => &[ENV_API_KEY],
            CredentialMode::ApiKey => &[],
        }
    }

    /// Extra `--settings` payload, serialized, if this mode needs one.
    pub(crate) fn settings_arg(&self) -> Option<String> {
        match self {
            CredentialMode::Subscription => Some(subscription_settings().to_string()),
            CredentialMode::ApiKey => None,
        }
    }
}
