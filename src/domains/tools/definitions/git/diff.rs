//! Git diff tool definition.
//!
//! Wraps `git diff`, optionally against the index.

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
    default_path, fail_result, fail_text, report_result,
};
use crate::domains::tools::definitions::exec::{resolve_cwd, run_command};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the git diff tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitDiffParams {
    /// Path to the repository working tree.
    #[serde(default = "default_path")]
    pub path: String,

    /// Diff staged changes instead of the working tree.
    #[serde(default)]
    pub staged: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Git diff tool - shows unstaged or staged changes.
pub struct GitDiffTool;

impl GitDiffTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "git_diff";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Show the git diff. Use staged=true for staged changes.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path, staged = params.staged))]
    pub async fn execute(params: &GitDiffParams, config: &Config) -> CallToolResult {
        info!("Git diff tool called for {}", params.path);

        let cwd = match resolve_cwd(&params.path, config) {
            Ok(dir) => dir,
            Err(e) => return fail_result(&e),
        };

        let mut cmd = Command::new("git");
        cmd.arg("diff");
        if params.staged {
            cmd.arg("--staged");
        }
        cmd.current_dir(&cwd);

        match run_command(cmd, "git", "git diff", None).await {
            Ok(output) if !output.success() => fail_text(format!(
                "git diff failed: {}",
                output.stderr.trim()
            )),
            Ok(output) if output.stdout.trim().is_empty() => {
                report_result("No changes to show".to_string())
            }
            Ok(output) => report_result(format!("Git diff:\n{}", output.stdout)),
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

        let staged = arguments
            .get("staged")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let params = GitDiffParams { path, staged };

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
            input_schema: cached_schema_for_type::<GitDiffParams>(),
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
                let params: GitDiffParams =
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

    fn git(dir: &std::path::Path, args: &[&str]) {
        std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
    }

    fn init_repo(dir: &std::path::Path) {
        git(dir, &["init"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    #[tokio::test]
    async fn test_git_diff_no_changes() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());

        let params = GitDiffParams {
            path: temp_dir.path().to_string_lossy().to_string(),
            staged: false,
        };

        let result = GitDiffTool::execute(&params, &test_config()).await;
        assert_eq!(result_text(&result), "No changes to show");
    }

    #[tokio::test]
    async fn test_git_diff_modified_file() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());

        let file = temp_dir.path().join("tracked.txt");
        std::fs::write(&file, "before\n").unwrap();
        git(temp_dir.path(), &["add", "."]);
        git(temp_dir.path(), &["commit", "-m", "base"]);
        std::fs::write(&file, "after\n").unwrap();

        let params = GitDiffParams {
            path: temp_dir.path().to_string_lossy().to_string(),
            staged: false,
        };

        let result = GitDiffTool::execute(&params, &test_config()).await;
        let text = result_text(&result);
        assert!(text.starts_with("Git diff:"));
        assert!(text.contains("tracked.txt"));
        assert!(text.contains("+after"));
    }

    #[tokio::test]
    async fn test_git_diff_staged() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());

        let file = temp_dir.path().join("tracked.txt");
        std::fs::write(&file, "before\n").unwrap();
        git(temp_dir.path(), &["add", "."]);
        git(temp_dir.path(), &["commit", "-m", "base"]);
        std::fs::write(&file, "after\n").unwrap();
        git(temp_dir.path(), &["add", "."]);

        // Working-tree diff is empty, staged diff is not
        let unstaged = GitDiffTool::execute(
            &GitDiffParams {
                path: temp_dir.path().to_string_lossy().to_string(),
                staged: false,
            },
            &test_config(),
        )
        .await;
        assert_eq!(result_text(&unstaged), "No changes to show");

        let staged = GitDiffTool::execute(
            &GitDiffParams {
                path: temp_dir.path().to_string_lossy().to_string(),
                staged: true,
            },
            &test_config(),
        )
        .await;
        assert!(result_text(&staged).contains("+after"));
    }
}
