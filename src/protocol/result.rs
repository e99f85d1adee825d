//! The CLI's final result object and billing failure detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker the CLI prints in compact JSON when the account is out of credits.
pub const CREDIT_BALANCE_MARKER: &str = r#""result":"Credit balance is too low""#;

const CREDIT_BALANCE_TEXT: &str = "Credit balance is too low";

/// Final result object emitted with `--output-format json` (or as the last
/// line of `stream-json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliResult {
    /// Message type, `"result"` for the final object.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Result subtype (`success`, `error_max_turns`, ...).
    #[serde(default)]
    pub subtype: Option<String>,
    /// Whether the CLI flagged the run as failed.
    #[serde(default)]
    pub is_error: bool,
    /// Final text result.
    #[serde(default)]
    pub result: Option<String>,
    /// Session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Total cost in USD.
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    /// Duration in milliseconds.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Number of conversation turns.
    #[serde(default)]
    pub num_turns: Option<u32>,
}

impl CliResult {
    /// Find the result object in captured stdout.
    ///
    /// The whole output is tried as one document first, then each line from
    /// the end, so both `json` and `stream-json` output are handled.
    pub fn parse(stdout: &str) -> Option<Self> {
        let stdout = stdout.trim();
        if let Ok(value) = serde_json::from_str::<Value>(stdout) {
            return Self::from_value(value);
        }

        stdout
            .lines()
            .rev()
            .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
            .find_map(Self::from_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        let is_result = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind == "result",
            None => value.get("result").is_some(),
        };
        if !is_result {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Check if this is a success result.
    pub fn is_success(&self) -> bool {
        !self.is_error && self.subtype.as_deref().map_or(true, |s| s == "success")
    }

    /// Get the duration as a std::time::Duration.
    pub fn duration(&self) -> Option<std::time::Duration> {
        self.duration_ms.map(std::time::Duration::from_millis)
    }
}

/// Check captured stdout for the CLI's low-credit-balance failure.
///
/// Matches the compact marker as a raw substring, and also any JSON document
/// in the output whose `result` starts with the credit-balance text, so
/// pretty-printed output is caught too.
pub fn is_credit_balance_error(stdout: &str) -> bool {
    if stdout.contains(CREDIT_BALANCE_MARKER) {
        return true;
    }
    if !stdout.contains(CREDIT_BALANCE_TEXT) {
        return false;
    }

    let mentions_credit = |value: &Value| {
        value
            .get("result")
            .and_then(Value::as_str)
            .is_some_and(|r| r.starts_with(CREDIT_BALANCE_TEXT))
    };

    if let Ok(value) = serde_json::from_str::<Value>(stdout.trim()) {
        return mentions_credit(&value);
    }
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
        .any(|value| mentions_credit(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_marker_detected() {
        let stdout = r#"{"type":"result","subtype":"success","is_error":true,"result":"Credit balance is too low"}"#;
        assert!(is_credit_balance_error(stdout));
    }

    #[test]
    fn marker_detected_inside_other_text() {
        let stdout = r#"warning: something
{"result":"Credit balance is too low","session_id":"abc"}"#;
        assert!(is_credit_balance_error(stdout));
    }

    #[test]
    fn pretty_printed_result_detected() {
        let stdout = "{\n  \"type\": \"result\",\n  \"result\": \"Credit balance is too low\"\n}";
        assert!(is_credit_balance_error(stdout));
    }

    #[test]
    fn stream_json_line_detected() {
        let stdout = concat!(
            r#"{"type":"system","subtype":"init"}"#,
            "\n",
            r#"{"type": "result", "result": "Credit balance is too low · Add funds"}"#,
        );
        assert!(is_credit_balance_error(stdout));
    }

    #[test]
    fn plain_text_mention_is_not_a_billing_failure() {
        assert!(!is_credit_balance_error(
            "The user asked why their Credit balance is too low."
        ));
        assert!(!is_credit_balance_error(r#"{"result":"All good"}"#));
        assert!(!is_credit_balance_error(""));
    }

    #[test]
    fn parse_json_result() {
        let stdout = r#"{"type":"result","subtype":"success","is_error":false,"result":"4","session_id":"s-1","total_cost_usd":0.002,"duration_ms":1500,"num_turns":1}"#;
        let result = CliResult::parse(stdout).unwrap();

        assert!(result.is_success());
        assert_eq!(result.result.as_deref(), Some("4"));
        assert_eq!(result.session_id.as_deref(), Some("s-1"));
        assert_eq!(
            result.duration(),
            Some(std::time::Duration::from_millis(1500))
        );
    }

    #[test]
    fn parse_stream_json_takes_result_line() {
        let stdout = concat!(
            r#"{"type":"system","subtype":"init","session_id":"s-2"}"#,
            "\n",
            r#"{"type":"assistant","message":{"content":[]}}"#,
            "\n",
            r#"{"type":"result","subtype":"error_max_turns","is_error":true,"result":"stopped"}"#,
            "\n",
        );
        let result = CliResult::parse(stdout).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.subtype.as_deref(), Some("error_max_turns"));
    }

    #[test]
    fn parse_text_output_yields_none() {
        assert!(CliResult::parse("Hello there").is_none());
        assert!(CliResult::parse(r#"{"type":"system"}"#).is_none());
    }
}
