//! List directory tool definition.
//!
//! Lists directory entries matching a glob pattern.

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
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::validate_path;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    default_glob, default_path, fail_result, report_result,
};

/// Listing stops after this many entries.
const MAX_ENTRIES: usize = 100;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the list directory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListDirectoryParams {
    /// Path to the directory to list.
    #[serde(default = "default_path")]
    pub path: String,

    /// Glob pattern applied to entry names.
    #[serde(default = "default_glob")]
    pub pattern: String,

    /// Include hidden entries (starting with '.').
    #[serde(default)]
    pub show_hidden: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// List directory tool - lists entries with type and size.
pub struct ListDirectoryTool;

impl ListDirectoryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_directory";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "List directory contents with an optional glob pattern. Returns entry types, sizes, and names.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &ListDirectoryParams, config: &Config) -> CallToolResult {
        info!("List directory tool called for path: {}", params.path);

        match Self::run(params, config) {
            Ok(report) => report_result(report),
            Err(e) => fail_result(&e),
        }
    }

    fn run(params: &ListDirectoryParams, config: &Config) -> Result<String, ToolError> {
        let full_path = validate_path(&params.path, config)?;

        if !full_path.is_dir() {
            return Err(ToolError::NotADirectory(full_path));
        }

        let matcher = Pattern::new(&params.pattern).map_err(|e| ToolError::InvalidPattern {
            pattern: params.pattern.clone(),
            reason: e.to_string(),
        })?;

        let entries = fs::read_dir(&full_path)
            .map_err(|e| ToolError::from_io_for_path(&full_path, "Error listing", e))?;

        let mut lines = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();

            if !params.show_hidden && name.starts_with('.') {
                continue;
            }
            if !matcher.matches(&name) {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                continue;
            };

            let item_type = if metadata.is_dir() { "DIR " } else { "FILE" };
            let size = if metadata.is_file() { metadata.len() } else { 0 };
            lines.push(format!("{} {:>10} {}", item_type, size, name));
        }

        if lines.is_empty() {
            return Ok(format!("Empty directory: {}", full_path.display()));
        }

        lines.sort();
        let truncated = lines.len() > MAX_ENTRIES;
        lines.truncate(MAX_ENTRIES);

        let mut report = format!("Directory: {}\n{}", full_path.display(), lines.join("\n"));
        if truncated {
            report.push_str(&format!("\n(truncated at {} entries)", MAX_ENTRIES));
        }
        Ok(report)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let path = arguments
            .get("path")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_path);

        let pattern = arguments
            .get("pattern")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_glob);

        let show_hidden = arguments
            .get("show_hidden")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let params = ListDirectoryParams {
            path,
            pattern,
            show_hidden,
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
            input_schema: cached_schema_for_type::<ListDirectoryParams>(),
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
                let params: ListDirectoryParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config))
            }
            .boxed()
        })
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

    fn params(path: &std::path::Path, pattern: &str, show_hidden: bool) -> ListDirectoryParams {
        ListDirectoryParams {
            path: path.to_string_lossy().to_string(),
            pattern: pattern.to_string(),
            show_hidden,
        }
    }

    #[test]
    fn test_list_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("file1.txt"), "content").unwrap();
        fs::write(temp_dir.path().join("file2.txt"), "content").unwrap();
        fs::create_dir(temp_dir.path().join("subdir")).unwrap();

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*", false), &test_config());
        assert!(result.is_error.is_none() || !result.is_error.unwrap());

        let text = result_text(&result);
        assert!(text.starts_with("Directory:"));
        assert!(text.contains("FILE"));
        assert!(text.contains("file1.txt"));
        assert!(text.contains("file2.txt"));
        assert!(text.contains("DIR "));
        assert!(text.contains("subdir"));
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*", false), &test_config());
        let text = result_text(&result);

        assert!(text.starts_with("Empty directory:"));
        assert!(!text.contains("FILE"));
        assert!(!text.contains("DIR "));
    }

    #[test]
    fn test_list_glob_filter_sorted() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "md").unwrap();

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*.txt", false), &test_config());
        let text = result_text(&result);

        assert!(text.contains("a.txt"));
        assert!(text.contains("b.txt"));
        assert!(!text.contains("notes.md"));

        // Sorted order
        let a_pos = text.find("a.txt").unwrap();
        let b_pos = text.find("b.txt").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_list_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".hidden"), "h").unwrap();
        fs::write(temp_dir.path().join("visible.txt"), "v").unwrap();

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*", false), &test_config());
        let text = result_text(&result);
        assert!(!text.contains(".hidden"));
        assert!(text.contains("visible.txt"));

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*", true), &test_config());
        let text = result_text(&result);
        assert!(text.contains(".hidden"));
    }

    #[test]
    fn test_list_caps_at_100_entries() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..120 {
            fs::write(temp_dir.path().join(format!("f{:03}.txt", i)), "x").unwrap();
        }

        let result =
            ListDirectoryTool::execute(&params(temp_dir.path(), "*", false), &test_config());
        let text = result_text(&result);

        let entry_lines = text.lines().filter(|l| l.starts_with("FILE")).count();
        assert_eq!(entry_lines, 100);
        assert!(text.contains("truncated"));
    }

    #[test]
    fn test_list_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = ListDirectoryTool::execute(
            &params(&file, "*", false),
            &test_config(),
        );
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("Not a directory"));
    }

    #[test]
    fn test_list_nonexistent() {
        let result = ListDirectoryTool::execute(
            &params(std::path::Path::new("/nonexistent/path/12345"), "*", false),
            &test_config(),
        );
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_params_defaults() {
        let params: ListDirectoryParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.path, ".");
        assert_eq!(params.pattern, "*");
        assert!(!params.show_hidden);
    }
}
