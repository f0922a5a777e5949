//! Write file tool definition.
//!
//! Overwrites or creates a file, backing up any prior version first.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::resolve_new_path;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{default_true, fail_result, ok_result};

/// Suffix appended to the file name of the pre-write backup copy.
const BACKUP_SUFFIX: &str = ".backup";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the write file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// Path to the file to write.
    pub path: String,

    /// Content to write.
    pub content: String,

    /// Create missing parent directories.
    #[serde(default = "default_true")]
    pub create_dirs: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Write file tool - overwrites or creates a file without confirmation.
///
/// If the target already exists it is first copied to a sibling path with a
/// `.backup` suffix. The backup is unconditional and unversioned: repeated
/// writes overwrite the single backup file.
pub struct WriteFileTool;

impl WriteFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "write_file";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Write content to a file, creating parent directories if needed. An existing file is backed up to a .backup sibling before being overwritten.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &WriteFileParams, config: &Config) -> CallToolResult {
        info!("Write file tool called for path: {}", params.path);

        match Self::run(params, config) {
            Ok(report) => ok_result(report),
            Err(e) => fail_result(&e),
        }
    }

    fn run(params: &WriteFileParams, config: &Config) -> Result<String, ToolError> {
        let full_path = resolve_new_path(&params.path, config)?;

        if params.create_dirs {
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    ToolError::io(format!("Error creating directories for '{}'", parent.display()), e)
                })?;
            }
        }

        // Backup existing file
        if full_path.exists() {
            let backup = backup_path(&full_path);
            fs::copy(&full_path, &backup).map_err(|e| {
                ToolError::io(format!("Error backing up '{}'", full_path.display()), e)
            })?;
        }

        fs::write(&full_path, &params.content)
            .map_err(|e| ToolError::from_io_for_path(&full_path, "Error writing", e))?;

        Ok(format!(
            "Wrote {} chars to {}",
            params.content.chars().count(),
            full_path.display()
        ))
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

        let content = arguments
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'content' parameter".to_string())?
            .to_string();

        let create_dirs = arguments
            .get("create_dirs")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let params = WriteFileParams {
            path,
            content,
            create_dirs,
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
            input_schema: cached_schema_for_type::<WriteFileParams>(),
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
                let params: WriteFileParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config))
            }
            .boxed()
        })
    }
}

/// Sibling path carrying the backup copy: `notes.txt` -> `notes.txt.backup`.
fn backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{file_name}{BACKUP_SUFFIX}"))
}

// ============================================================================
// Tests
// ============================================================================
