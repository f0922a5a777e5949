//! Shell execution tool definition.
//!
//! Runs an arbitrary command through `sh -c`. No allow-list, no isolation;
//! the wall-clock timeout is the only limit.

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

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the shell execution tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunBashParams {
    /// Command line to execute via `sh -c`.
    pub command: String,

    /// Working directory for the command.
    #[serde(default = "default_path")]
    pub cwd: String,

    /// Timeout in seconds. Defaults to the server's shell timeout (300s).
    #[serde(default)]
    pub timeout: Option<u64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Shell execution tool - runs a command and captures its output.
pub struct RunBashTool;

impl RunBashTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "run_bash";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Execute a shell command and capture stdout, stderr, and the exit code.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(command = %params.command))]
    pub async fn execute(params: &RunBashParams, config: &Config) -> CallToolResult {
        info!("Bash tool called: '{}'", params.command);

        let cwd = match resolve_cwd(&params.cwd, config) {
            Ok(dir) => dir,
            Err(e) => return fail_result(&e),
        };

        let timeout = params.timeout.unwrap_or(config.exec.bash_timeout_secs);

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&params.command).current_dir(&cwd);

        match run_command(cmd, "sh", &params.command, Some(Duration::from_secs(timeout))).await {
            Ok(output) => exec_report(
                &format!("Executed: {}", params.command),
                &output,
                "STDOUT",
                "STDERR",
            ),
            Err(e) => fail_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let command = arguments
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'command' parameter".to_string())?
            .to_string();

        let cwd = arguments
            .get("cwd")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_path);

        let timeout = arguments.get("timeout").and_then(|v| v.as_u64());

        let params = RunBashParams {
            command,
            cwd,
            timeout,
        };

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
            input_schema: cached_schema_for_type::<RunBashParams>(),
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
                let params: RunBashParams =
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
