//! Common utilities shared across tool definitions.
//!
//! Result construction helpers that keep the wire format uniform: success
//! reports carry a leading `✓`, failures a leading `✗` with the originating
//! error's description. Neutral informational reports (listings, diffs) go
//! through [`report_result`] unmarked.

use rmcp::model::{CallToolResult, Content};
use tracing::warn;

use crate::domains::tools::ToolError;

/// Create a success result whose text already carries its `✓` marker or is
/// intentionally unmarked (listings, tables, diffs).
pub fn report_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Create a `✓`-marked success result.
pub fn ok_result(text: impl AsRef<str>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!("✓ {}", text.as_ref()))])
}

/// Create a `✗`-marked failure result from a tool error.
pub fn fail_result(error: &ToolError) -> CallToolResult {
    warn!("{}", error);
    CallToolResult::error(vec![Content::text(format!("✗ {}", error))])
}

/// Create a `✗`-marked failure result from pre-formatted text (used when the
/// failure carries subprocess output rather than a single error line).
pub fn fail_text(text: impl AsRef<str>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("✗ {}", text.as_ref()))])
}

/// Default for path parameters: the current directory.
pub fn default_path() -> String {
    ".".to_string()
}

/// Default for glob parameters: match everything.
pub fn default_glob() -> String {
    "*".to_string()
}

/// Default for boolean parameters that are on unless disabled.
pub fn default_true() -> bool {
    true
}

/// Extract the text payload of a result (test helper used across tool tests).
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        let ok = ok_result("Wrote 5 chars");
        assert!(result_text(&ok).starts_with("✓ "));
        assert!(ok.is_error.is_none() || !ok.is_error.unwrap());

        let err = fail_result(&ToolError::UnsupportedEncoding("latin-1".into()));
        assert!(result_text(&err).starts_with("✗ "));
        assert!(err.is_error.unwrap_or(false));
    }

    #[test]
    fn test_report_result_unmarked() {
        let result = report_result("Directory: /tmp".to_string());
        assert!(result_text(&result).starts_with("Directory:"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_path(), ".");
        assert_eq!(default_glob(), "*");
        assert!(default_true());
    }
}
