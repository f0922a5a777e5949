//! Search files tool definition.
//!
//! Recursive, case-insensitive substring search across a directory tree.

use futures::FutureExt;
use glob::Pattern;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::validate_path;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    default_glob, default_path, fail_result, report_result,
};

/// The search stops after this many matches.
const MAX_MATCHES: usize = 100;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search files tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchFilesParams {
    /// Text to search for (case-insensitive substring).
    pub pattern: String,

    /// Directory to search under.
    #[serde(default = "default_path")]
    pub path: String,

    /// Glob pattern applied to file names.
    #[serde(default = "default_glob")]
    pub file_pattern: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Search files tool - grep-like substring search.
///
/// Hidden files and directories are always skipped. Files that cannot be
/// read as text are silently ignored.
pub struct SearchFilesTool;

impl SearchFilesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_files";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Search for a text pattern in files under a directory. Case-insensitive, capped at 100 matches.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(pattern = %params.pattern, path = %params.path))]
    pub fn execute(params: &SearchFilesParams, config: &Config) -> CallToolResult {
        info!(
            "Search files tool called: '{}' under {}",
            params.pattern, params.path
        );

        match Self::run(params, config) {
            Ok(report) => report_result(report),
            Err(e) => fail_result(&e),
        }
    }

    fn run(params: &SearchFilesParams, config: &Config) -> Result<String, ToolError> {
        let root = validate_path(&params.path, config)?;

        if !root.is_dir() {
            return Err(ToolError::NotADirectory(root));
        }

        let matcher =
            Pattern::new(&params.file_pattern).map_err(|e| ToolError::InvalidPattern {
                pattern: params.file_pattern.clone(),
                reason: e.to_string(),
            })?;

        let needle = params.pattern.to_lowercase();
        let mut matches = Vec::new();
        search_tree(&root, &matcher, &needle, &mut matches);

        if matches.is_empty() {
            return Ok(format!(
                "No matches found for '{}' in {}",
                params.pattern,
                root.display()
            ));
        }

        Ok(format!(
            "Found {} matches:\n{}",
            matches.len(),
            matches.join("\n")
        ))
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let pattern = arguments
            .get("pattern")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'pattern' parameter".to_string())?
            .to_string();

        let path = arguments
            .get("path")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_path);

        let file_pattern = arguments
            .get("file_pattern")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_glob);

        let params = SearchFilesParams {
            pattern,
            path,
            file_pattern,
        };

        let result = Self::execute(&params, &config);

        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchFilesParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: SearchFilesParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Depth-first walk collecting `path:line:text` entries until the cap is hit.
///
/// Entries are visited in name order so results are deterministic. Unreadable
/// directories and files are skipped.
fn search_tree(dir: &Path, matcher: &Pattern, needle: &str, matches: &mut Vec<String>) {
    if matches.len() >= MAX_MATCHES {
        return;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut children: Vec<fs::DirEntry> = entries.filter_map(|e| e.ok()).collect();
    children.sort_by_key(|e| e.file_name());

    for entry in children {
        if matches.len() >= MAX_MATCHES {
            return;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            search_tree(&path, matcher, needle, matches);
        } else if path.is_file() && matcher.matches(&name) {
            search_file(&path, needle, matches);
        }
    }
}

/// Scan one file line by line for the lowercased needle.
fn search_file(path: &Path, needle: &str, matches: &mut Vec<String>) {
    let Ok(bytes) = fs::read(path) else {
        return;
    };
    let content = String::from_utf8_lossy(&bytes);

    for (line_num, line) in content.lines().enumerate() {
        if matches.len() >= MAX_MATCHES {
            return;
        }
        if line.to_lowercase().contains(needle) {
            matches.push(format!("{}:{}:{}", path.display(), line_num + 1, line.trim()));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::result_text;
    use tempfile::TempDir;

    fn test_config() -> Config {
        Config::default()
    }

    fn params(path: &Path, pattern: &str, file_pattern: &str) -> SearchFilesParams {
        SearchFilesParams {
            pattern: pattern.to_string(),
            path: path.to_string_lossy().to_string(),
            file_pattern: file_pattern.to_string(),
        }
    }

    #[test]
    fn test_search_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("greeting.txt"), "say hello world\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "HELLO", "*"), &test_config());
        let text = result_text(&result);

        assert!(text.starts_with("Found 1 matches:"));
        assert!(text.contains("greeting.txt:1:say hello world"));
    }

    #[test]
    fn test_search_recurses_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("nested/deeper");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("inner.txt"), "needle here\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "needle", "*"), &test_config());
        let text = result_text(&result);
        assert!(text.contains("inner.txt:1:needle here"));
    }

    #[test]
    fn test_search_file_pattern_filter() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("keep.rs"), "target\n").unwrap();
        fs::write(temp_dir.path().join("skip.md"), "target\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "target", "*.rs"), &test_config());
        let text = result_text(&result);
        assert!(text.contains("keep.rs"));
        assert!(!text.contains("skip.md"));
    }

    #[test]
    fn test_search_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "nothing relevant\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "absent", "*"), &test_config());
        let text = result_text(&result);
        assert!(text.starts_with("No matches found for 'absent'"));
    }

    #[test]
    fn test_search_cap_at_100() {
        let temp_dir = TempDir::new().unwrap();
        let many_lines = "match\n".repeat(250);
        fs::write(temp_dir.path().join("big.txt"), &many_lines).unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "match", "*"), &test_config());
        let text = result_text(&result);

        assert!(text.starts_with("Found 100 matches:"));
        assert_eq!(text.lines().count(), 101);
    }

    #[test]
    fn test_search_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".secret"), "needle\n").unwrap();
        let hidden_dir = temp_dir.path().join(".git");
        fs::create_dir(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("config"), "needle\n").unwrap();
        fs::write(temp_dir.path().join("open.txt"), "needle\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "needle", "*"), &test_config());
        let text = result_text(&result);

        assert!(text.starts_with("Found 1 matches:"));
        assert!(text.contains("open.txt"));
    }

    #[test]
    fn test_search_skips_binary_gracefully() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blob.bin"), [0u8, 159, 146, 150]).unwrap();
        fs::write(temp_dir.path().join("plain.txt"), "findme\n").unwrap();

        let result =
            SearchFilesTool::execute(&params(temp_dir.path(), "findme", "*"), &test_config());
        assert!(result_text(&result).contains("plain.txt"));
    }
}
