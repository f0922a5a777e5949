//! Python execution tool definition.
//!
//! Runs inline code through a `python3 -c` subprocess.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::domains::tools::definitions::common::{default_path, fail_result};

use super::{exec_report, resolve_cwd, run_command};

/// Interpreter binary looked up on PATH.
const PYTHON_BIN: &str = "python3";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the Python execution tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunPythonParams {
    /// Python source to execute.
    pub code: String,

    /// Working directory for the interpreter.
    #[serde(default = "default_path")]
    pub cwd: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Python execution tool - runs inline code with the runner timeout.
pub struct RunPythonTool;

impl RunPythonTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "run_python";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Execute inline Python code via the python3 interpreter.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub async fn execute(params: &RunPythonParams, config: &Config) -> CallToolResult {
        info!("Python tool called ({} chars of code)", params.code.len());

        let cwd = match resolve_cwd(&params.cwd, config) {
            Ok(dir) => dir,
            Err(e) => return fail_result(&e),
        };

        let timeout = config.exec.runner_timeout_secs;

        let mut cmd = Command::new(PYTHON_BIN);
        cmd.arg("-c").arg(&params.code).current_dir(&cwd);

        match run_command(cmd, PYTHON_BIN, "python code", Some(Duration::from_secs(timeout)))
            .await
        {
            Ok(output) => exec_report("Executed Python", &output, "OUTPUT", "ERRORS"),
            Err(e) => fail_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let code = arguments
            .get("code")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'code' parameter".to_string())?
            .to_string();

        let cwd = arguments
            .get("cwd")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_path);

        let params = RunPythonParams { code, cwd };

        let result = Self::execute(&params, &config).await;

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
            input_schema: cached_schema_for_type::<RunPythonParams>(),
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
                let params: RunPythonParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
