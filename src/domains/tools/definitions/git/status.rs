//! Git status tool definition.
//!
//! Wraps `git status --short`.

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
use crate::domains::tools::definitions::common::{
    default_path, fail_result, fail_text, ok_result, report_result,
};
use crate::domains::tools::definitions::exec::{resolve_cwd, run_command};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the git status tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitStatusParams {
    /// Path to the repository working tree.
    #[serde(default = "default_path")]
    pub path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Git status tool - short working-tree status.
pub struct GitStatusTool;

impl GitStatusTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "git_status";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the git repository status (short format).";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub async fn execute(params: &GitStatusParams, config: &Config) -> CallToolResult {
        info!("Git status tool called for {}", params.path);

        let cwd = match resolve_cwd(&params.path, config) {
            Ok(dir) => dir,
            Err(e) => return fail_result(&e),
        };

        let mut cmd = Command::new("git");
        cmd.args(["status", "--short"]).current_dir(&cwd);

        match run_command(cmd, "git", "git status", None).await {
            Ok(output) if !output.success() => {
                fail_text(format!("Not a git repository: {}", params.path))
            }
            Ok(output) if output.stdout.trim().is_empty() => ok_result("Working tree clean"),
            Ok(output) => report_result(format!("Git status:\n{}", output.stdout)),
            Err(e) => fail_result(&e),
        }
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

        let params = GitStatusParams { path };

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
            input_schema: cached_schema_for_type::<GitStatusParams>(),
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
                let params: GitStatusParams =
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
    use tempfile::TempDir;

    fn test_config() -> Config {
        Config::default()
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .is_ok()
    }

    fn init_repo(dir: &std::path::Path) {
        for args in [
            vec!["init"],
            vec!["config", "user.email", "test@example.com"],
            vec!["config", "user.name", "Test"],
        ] {
            std::process::Command::new("git")
                .args(&args)
                .current_dir(dir)
                .output()
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_git_status_not_a_repo() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let params = GitStatusParams {
            path: temp_dir.path().to_string_lossy().to_string(),
        };

        let result = GitStatusTool::execute(&params, &test_config()).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("Not a git repository"));
    }

    #[tokio::test]
    async fn test_git_status_clean_tree() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());

        let params = GitStatusParams {
            path: temp_dir.path().to_string_lossy().to_string(),
        };

        let result = GitStatusTool::execute(&params, &test_config()).await;
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(result_text(&result).contains("Working tree clean"));
    }

    #[tokio::test]
    async fn test_git_status_dirty_tree() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());
        std::fs::write(temp_dir.path().join("new.txt"), "untracked").unwrap();

        let params = GitStatusParams {
            path: temp_dir.path().to_string_lossy().to_string(),
        };

        let result = GitStatusTool::execute(&params, &test_config()).await;
        let text = result_text(&result);
        assert!(text.starts_with("Git status:"));
        assert!(text.contains("new.txt"));
    }
}
