//! Read file tool definition.
//!
//! Returns the full text of a file along with its character count.

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

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Path to the file to read.
    pub path: String,

    /// Text encoding of the file. Only UTF-8 is supported.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Read file tool - returns the full text of any readable file.
pub struct ReadFileTool;

impl ReadFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "read_file";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Read file contents. Returns the full text of any file.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &ReadFileParams, config: &Config) -> CallToolResult {
        info!("Read file tool called for path: {}", params.path);

        match Self::run(params, config) {
            Ok(report) => ok_result(report),
            Err(e) => fail_result(&e),
        }
    }

    fn run(params: &ReadFileParams, config: &Config) -> Result<String, ToolError> {
        let encoding = params.encoding.to_lowercase().replace('_', "-");
        if encoding != "utf-8" && encoding != "utf8" {
            return Err(ToolError::UnsupportedEncoding(params.encoding.clone()));
        }

        let full_path = validate_path(&params.path, config)?;

        let bytes = fs::read(&full_path)
            .map_err(|e| ToolError::from_io_for_path(&full_path, "Error reading", e))?;

        let content = String::from_utf8(bytes).map_err(|e| {
            ToolError::io(
                format!("Error decoding '{}' as UTF-8", full_path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        Ok(format!(
            "Read {} chars from {}\n\n{}",
            content.chars().count(),
            full_path.display(),
            content
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

        let encoding = arguments
            .get("encoding")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_encoding);

        let params = ReadFileParams { path, encoding };

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
            input_schema: cached_schema_for_type::<ReadFileParams>(),
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
                let params: ReadFileParams =
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
