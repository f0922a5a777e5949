//! Docker exec tool definition.
//!
//! Runs a shell command inside a running container.

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
use crate::domains::tools::definitions::common::{fail_result, fail_text, ok_result};
use crate::domains::tools::definitions::exec::run_command;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the docker exec tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DockerExecParams {
    /// Name or ID of the running container.
    pub container: String,

    /// Command line executed via `sh -c` inside the container.
    pub command: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Docker exec tool - runs a command in a running container.
pub struct DockerExecTool;

impl DockerExecTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "docker_exec";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Execute a shell command in a running Docker container.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(container = %params.container))]
    pub async fn execute(params: &DockerExecParams, config: &Config) -> CallToolResult {
        info!("Docker exec tool called for container {}", params.container);

        let mut cmd = Command::new("docker");
        cmd.args(["exec", &params.container, "sh", "-c", &params.command]);

        let descriptor = format!("docker exec {}", params.container);
        let timeout = Duration::from_secs(config.exec.runner_timeout_secs);

        match run_command(cmd, "docker", &descriptor, Some(timeout)).await {
            Ok(output) if output.success() => ok_result(format!(
                "Executed in {}:\n{}",
                params.container,
                output.stdout.trim_end()
            )),
            Ok(output) => fail_text(format!(
                "(exit {}) Executed in {}:\n{}",
                output.exit_code,
                params.container,
                output.stderr.trim_end()
            )),
            Err(e) => fail_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let container = arguments
            .get("container")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'container' parameter".to_string())?
            .to_string();

        let command = arguments
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'command' parameter".to_string())?
            .to_string();

        let params = DockerExecParams { container, command };

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
            input_schema: cached_schema_for_type::<DockerExecParams>(),
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
                let params: DockerExecParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::result_text;

    fn docker_available() -> bool {
        std::process::Command::new("docker")
            .arg("--version")
            .output()
            .is_ok()
    }

    #[tokio::test]
    async fn test_docker_exec_missing_container_fails() {
        if !docker_available() {
            return;
        }

        let params = DockerExecParams {
            container: "devkit-test-no-such-container-12345".to_string(),
            command: "echo hi".to_string(),
        };

        let result = DockerExecTool::execute(&params, &Config::default()).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).starts_with("✗ "));
    }

    #[test]
    fn test_params_require_container_and_command() {
        let missing: Result<DockerExecParams, _> =
            serde_json::from_value(serde_json::json!({ "container": "x" }));
        assert!(missing.is_err());
    }
}
