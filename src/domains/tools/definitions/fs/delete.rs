//! Delete path tool definition.
//!
//! Removes a file or directory. No confirmation step, no dry-run mode.

use futures::FutureExt;
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
use crate::domains::tools::definitions::common::{fail_result, ok_result};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the delete path tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePathParams {
    /// Path to the file or directory to delete.
    pub path: String,

    /// Recursively delete directories and their contents.
    /// Required to delete non-empty directories.
    #[serde(default)]
    pub recursive: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Delete path tool - deletes files and directories.
pub struct DeletePathTool;

impl DeletePathTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "delete_path";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Delete a file or directory. Use recursive=true to delete non-empty directories and their contents.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &DeletePathParams, config: &Config) -> CallToolResult {
        info!("Delete tool called: '{}'", params.path);

        match Self::run(params, config) {
            Ok(report) => ok_result(report),
            Err(e) => fail_result(&e),
        }
    }

    fn run(params: &DeletePathParams, config: &Config) -> Result<String, ToolError> {
        let target = validate_path(&params.path, config)?;

        if target.is_dir() {
            if params.recursive {
                fs::remove_dir_all(&target)
                    .map_err(|e| ToolError::from_io_for_path(&target, "Error deleting", e))?;
                return Ok(format!("Deleted directory: {}", target.display()));
            }

            // Probe emptiness up front so the caller gets the dedicated
            // error instead of a raw OS message.
            let mut entries = fs::read_dir(&target)
                .map_err(|e| ToolError::from_io_for_path(&target, "Error reading", e))?;
            if entries.next().is_some() {
                return Err(ToolError::DirectoryNotEmpty(target));
            }

            fs::remove_dir(&target)
                .map_err(|e| ToolError::from_io_for_path(&target, "Error deleting", e))?;
            return Ok(format!("Deleted empty directory: {}", target.display()));
        }

        fs::remove_file(&target)
            .map_err(|e| ToolError::from_io_for_path(&target, "Error deleting", e))?;
        Ok(format!("Deleted file: {}", target.display()))
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
            .ok_or_else(|| "Missing or invalid 'path' parameter".to_string())?
            .to_string();

        let recursive = arguments
            .get("recursive")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let params = DeletePathParams { path, recursive };

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
            input_schema: cached_schema_for_type::<DeletePathParams>(),
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
                let params: DeletePathParams =
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

    fn params(path: &std::path::Path, recursive: bool) -> DeletePathParams {
        DeletePathParams {
            path: path.to_string_lossy().to_string(),
            recursive,
        }
    }

    #[test]
    fn test_delete_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.txt");
        fs::write(&file, "test content").unwrap();

        let result = DeletePathTool::execute(&params(&file, false), &test_config());
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(result_text(&result).contains("Deleted file"));
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("empty_dir");
        fs::create_dir(&dir).unwrap();

        let result = DeletePathTool::execute(&params(&dir, false), &test_config());
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(result_text(&result).contains("Deleted empty directory"));
        assert!(!dir.exists());
    }

    #[test]
    fn test_delete_nonempty_directory_without_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nonempty_dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("file.txt"), "content").unwrap();

        let result = DeletePathTool::execute(&params(&dir, false), &test_config());
        assert!(result.is_error.unwrap_or(false));

        let text = result_text(&result);
        assert!(text.contains("not empty"));
        assert!(text.contains("recursive=true"));

        // Directory untouched
        assert!(dir.exists());
        assert!(dir.join("file.txt").exists());
    }

    #[test]
    fn test_delete_nonempty_directory_with_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nonempty_dir");
        let sub = dir.join("subdir");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.join("file1.txt"), "content1").unwrap();
        fs::write(sub.join("file2.txt"), "content2").unwrap();

        let result = DeletePathTool::execute(&params(&dir, true), &test_config());
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(result_text(&result).contains("Deleted directory"));
        assert!(!dir.exists());
    }

    #[test]
    fn test_delete_nonexistent_path() {
        let result = DeletePathTool::execute(
            &params(std::path::Path::new("/nonexistent/path/to/file.txt"), false),
            &test_config(),
        );
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("does not exist"));
    }
}
