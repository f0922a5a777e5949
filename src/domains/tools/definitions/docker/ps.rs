//! Docker ps tool definition.
//!
//! Lists containers via `docker ps`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::domains::tools::definitions::common::{fail_result, fail_text, report_result};
use crate::domains::tools::definitions::exec::run_command;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the docker ps tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DockerPsParams {
    /// Include stopped containers (`-a`).
    #[serde(default)]
    pub all_containers: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Docker ps tool - lists containers.
pub struct DockerPsTool;

impl DockerPsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "docker_ps";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "List Docker containers. Use all_containers=true to include stopped ones.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub async fn execute(params: &DockerPsParams, _config: &Config) -> CallToolResult {
        info!("Docker ps tool called (all={})", params.all_containers);

        let mut cmd = Command::new("docker");
        cmd.arg("ps");
        if params.all_containers {
            cmd.arg("-a");
        }

        match run_command(cmd, "docker", "docker ps", None).await {
            Ok(output) if output.success() => {
                report_result(format!("Docker containers:\n{}", output.stdout))
            }
            Ok(output) => fail_text(format!("docker ps failed: {}", output.stderr.trim())),
            Err(e) => fail_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let all_containers = arguments
            .get("all_containers")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let params = DockerPsParams { all_containers };

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
            input_schema: cached_schema_for_type::<DockerPsParams>(),
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
                let params: DockerPsParams =
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
