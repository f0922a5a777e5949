//! Git commit tool definition.
//!
//! Optionally stages everything, then commits with the given message.

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
    default_path, default_true, fail_result, fail_text, ok_result,
};
use crate::domains::tools::definitions::exec::{CommandOutput, resolve_cwd, run_command};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the git commit tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitCommitParams {
    /// Commit message.
    pub message: String,

    /// Path to the repository working tree.
    #[serde(default = "default_path")]
    pub path: String,

    /// Stage all changes (`git add .`) before committing.
    #[serde(default = "default_true")]
    pub add_all: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Git commit tool - stages and commits in one call.
pub struct GitCommitTool;

impl GitCommitTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "git_commit";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Create a git commit. Stages all files first when add_all=true.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all, fields(path = %params.path))]
    pub async fn execute(params: &GitCommitParams, config: &Config) -> CallToolResult {
        info!("Git commit tool called for {}", params.path);

        let cwd = match resolve_cwd(&params.path, config) {
            Ok(dir) => dir,
            Err(e) => return fail_result(&e),
        };

        if params.add_all {
            let mut add = Command::new("git");
            add.args(["add", "."]).current_dir(&cwd);

            match run_command(add, "git", "git add", None).await {
                Ok(output) if !output.success() => {
                    return fail_text(format!("Error committing: {}", combined_output(&output)));
                }
                Err(e) => return fail_result(&e),
                Ok(_) => {}
            }
        }

        let mut commit = Command::new("git");
        commit
            .args(["commit", "-m", &params.message])
            .current_dir(&cwd);

        match run_command(commit, "git", "git commit", None).await {
            Ok(output) if output.success() => ok_result(format!(
                "Committed: {}\n{}",
                params.message,
                output.stdout.trim_end()
            )),
            Ok(output) => fail_text(format!("Error committing: {}", combined_output(&output))),
            Err(e) => fail_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let message = arguments
            .get("message")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Missing or invalid 'message' parameter".to_string())?
            .to_string();

        let path = arguments
            .get("path")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(default_path);

        let add_all = arguments
            .get("add_all")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);

        let params = GitCommitParams {
            message,
            path,
            add_all,
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
            input_schema: cached_schema_for_type::<GitCommitParams>(),
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
                let params: GitCommitParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

/// git reports "nothing to commit" on stdout and real errors on stderr;
/// show whichever is populated.
fn combined_output(output: &CommandOutput) -> String {
    let stdout = output.stdout.trim();
    let stderr = output.stderr.trim();
    match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{}\n{}", stdout, stderr),
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (true, true) => format!("git commit exited with code {}", output.exit_code),
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

    fn params(dir: &std::path::Path, message: &str, add_all: bool) -> GitCommitParams {
        GitCommitParams {
            message: message.to_string(),
            path: dir.to_string_lossy().to_string(),
            add_all,
        }
    }

    #[tokio::test]
    async fn test_git_commit_with_add_all() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());
        std::fs::write(temp_dir.path().join("file.txt"), "content").unwrap();

        let result = GitCommitTool::execute(
            &params(temp_dir.path(), "initial commit", true),
            &test_config(),
        )
        .await;

        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(result_text(&result).contains("Committed: initial commit"));
    }

    #[tokio::test]
    async fn test_git_commit_nothing_to_commit() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());

        let result = GitCommitTool::execute(
            &params(temp_dir.path(), "empty commit", true),
            &test_config(),
        )
        .await;

        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("Error committing"));
    }

    #[tokio::test]
    async fn test_git_commit_outside_repo() {
        if !git_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();

        let result =
            GitCommitTool::execute(&params(temp_dir.path(), "nope", true), &test_config()).await;
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_combined_output_prefers_populated_streams() {
        let both = CommandOutput {
            stdout: "out\n".into(),
            stderr: "err\n".into(),
            exit_code: 1,
        };
        assert_eq!(combined_output(&both), "out\nerr");

        let neither = CommandOutput {
            stdout: "".into(),
            stderr: "".into(),
            exit_code: 128,
        };
        assert!(combined_output(&neither).contains("128"));
    }

    #[test]
    fn test_params_defaults() {
        let params: GitCommitParams =
            serde_json::from_value(serde_json::json!({ "message": "m" })).unwrap();
        assert_eq!(params.path, ".");
        assert!(params.add_all);
    }
}
