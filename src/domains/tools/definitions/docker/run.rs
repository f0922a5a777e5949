//! Docker run tool definition.
//!
//! Starts a container from an image, with optional port mappings.

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

/// Parameters for the docker run tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DockerRunParams {
    /// Image to run.
    pub image: String,

    /// Command to run inside the container (space-separated).
    #[serde(default)]
    pub command: String,

    /// Run detached (`-d`).
    #[serde(default)]
    pub detach: bool,

    /// Comma-separated port mappings, e.g. "8080:80,9090:90".
    #[serde(default)]
    pub ports: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Docker run tool - starts a container.
pub struct DockerRunTool;

impl DockerRunTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "docker_run";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Run a Docker container from an image, optionally detached and with port mappings.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(image = %params.image))]
    pub async fn execute(params: &DockerRunParams, config: &Config) -> CallToolResult {
        info!("Docker run tool called for image {}", params.image);

        let mut cmd = Command::new("docker");
        cmd.arg("run");

        if params.detach {
            cmd.arg("-d");
        }

        for port_map in params.ports.split(',') {
            let port_map = port_map.trim();
            if !port_map.is_empty() {
                cmd.args(["-p", port_map]);
            }
        }

        cmd.arg(&params.image);

        if !params.command.is_empty() {
            cmd.args(params.command.split_whitespace());
        }

        let descriptor = format!("docker run {}", params.image);
        let timeout = Duration::from_secs(config.exec.bash_timeout_secs);

        match run_command(cmd, "docker", &descriptor, Some(timeout)).await {
            Ok(output) if output.success() => ok_result(format!(
                "Container started\n{}",
                output.stdout.trim_end()
            )),
            Ok(output) => fail_text(format!(
                "(exit {}) docker run failed:\n{}",
                output.exit_code,
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
        let image = arguments
            .get("image")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'image' parameter".to_string())?
            .to_string();

        let command = arguments
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let detach = arguments
            .get("detach")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let ports = arguments
            .get("ports")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let params = DockerRunParams {
            image,
            command,
            detach,
            ports,
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
            input_schema: cached_schema_for_type::<DockerRunParams>(),
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
                let params: DockerRunParams =
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

    fn test_config() -> Config {
        Config::default()
    }

    fn docker_available() -> bool {
        std::process::Command::new("docker")
            .arg("--version")
            .output()
            .is_ok()
    }

    #[tokio::test]
    async fn test_docker_run_unknown_image_fails() {
        if !docker_available() {
            return;
        }

        let params = DockerRunParams {
            image: "devkit-test-nonexistent-image-12345".to_string(),
            command: String::new(),
            detach: false,
            ports: String::new(),
        };

        let result = DockerRunTool::execute(&params, &test_config()).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).starts_with("✗ "));
    }

    #[tokio::test]
    async fn test_docker_run_spawn_failure_reported() {
        if docker_available() {
            return;
        }

        // Without a docker binary the spawn failure is reported, not raised
        let params = DockerRunParams {
            image: "alpine".to_string(),
            command: String::new(),
            detach: false,
            ports: String::new(),
        };

        let result = DockerRunTool::execute(&params, &test_config()).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("Failed to start docker"));
    }

    #[test]
    fn test_params_defaults() {
        let params: DockerRunParams =
            serde_json::from_value(serde_json::json!({ "image": "alpine" })).unwrap();
        assert!(params.command.is_empty());
        assert!(!params.detach);
        assert!(params.ports.is_empty());
    }
}
