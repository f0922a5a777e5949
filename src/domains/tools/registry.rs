//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;

use super::definitions::{
    DeletePathTool, DockerExecTool, DockerPsTool, DockerRunTool, GitCommitTool, GitDiffTool,
    GitStatusTool, ListDirectoryTool, ReadFileTool, RunBashTool, RunNodeTool, RunPythonTool,
    SearchFilesTool, SystemInfoTool, WriteFileTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ReadFileTool::NAME,
            WriteFileTool::NAME,
            ListDirectoryTool::NAME,
            SearchFilesTool::NAME,
            DeletePathTool::NAME,
            RunBashTool::NAME,
            RunPythonTool::NAME,
            RunNodeTool::NAME,
            GitStatusTool::NAME,
            GitCommitTool::NAME,
            GitDiffTool::NAME,
            DockerRunTool::NAME,
            DockerPsTool::NAME,
            DockerExecTool::NAME,
            SystemInfoTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            ReadFileTool::to_tool(),
            WriteFileTool::to_tool(),
            ListDirectoryTool::to_tool(),
            SearchFilesTool::to_tool(),
            DeletePathTool::to_tool(),
            RunBashTool::to_tool(),
            RunPythonTool::to_tool(),
            RunNodeTool::to_tool(),
            GitStatusTool::to_tool(),
            GitCommitTool::to_tool(),
            GitDiffTool::to_tool(),
            DockerRunTool::to_tool(),
            DockerPsTool::to_tool(),
            DockerExecTool::to_tool(),
            SystemInfoTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools. Subprocess-backed
    /// tools await their child processes, so dispatch is async.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        match name {
            ReadFileTool::NAME => {
                ReadFileTool::http_handler(arguments, self.config.clone()).await
            }
            WriteFileTool::NAME => {
                WriteFileTool::http_handler(arguments, self.config.clone()).await
            }
            ListDirectoryTool::NAME => {
                ListDirectoryTool::http_handler(arguments, self.config.clone()).await
            }
            SearchFilesTool::NAME => {
                SearchFilesTool::http_handler(arguments, self.config.clone()).await
            }
            DeletePathTool::NAME => {
                DeletePathTool::http_handler(arguments, self.config.clone()).await
            }
            RunBashTool::NAME => RunBashTool::http_handler(arguments, self.config.clone()).await,
            RunPythonTool::NAME => {
                RunPythonTool::http_handler(arguments, self.config.clone()).await
            }
            RunNodeTool::NAME => RunNodeTool::http_handler(arguments, self.config.clone()).await,
            GitStatusTool::NAME => {
                GitStatusTool::http_handler(arguments, self.config.clone()).await
            }
            GitCommitTool::NAME => {
                GitCommitTool::http_handler(arguments, self.config.clone()).await
            }
            GitDiffTool::NAME => GitDiffTool::http_handler(arguments, self.config.clone()).await,
            DockerRunTool::NAME => {
                DockerRunTool::http_handler(arguments, self.config.clone()).await
            }
            DockerPsTool::NAME => {
                DockerPsTool::http_handler(arguments, self.config.clone()).await
            }
            DockerExecTool::NAME => {
                DockerExecTool::http_handler(arguments, self.config.clone()).await
            }
            SystemInfoTool::NAME => SystemInfoTool::http_handler(arguments).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_config());
        let names = registry.tool_names();
        assert_eq!(names.len(), 15);
        assert!(names.contains(&"read_file"));
        assert!(names.contains(&"write_file"));
        assert!(names.contains(&"list_directory"));
        assert!(names.contains(&"search_files"));
        assert!(names.contains(&"delete_path"));
        assert!(names.contains(&"run_bash"));
        assert!(names.contains(&"run_python"));
        assert!(names.contains(&"run_node"));
        assert!(names.contains(&"git_status"));
        assert!(names.contains(&"git_commit"));
        assert!(names.contains(&"git_diff"));
        assert!(names.contains(&"docker_run"));
        assert!(names.contains(&"docker_ps"));
        assert!(names.contains(&"docker_exec"));
        assert!(names.contains(&"get_system_info"));
    }

    #[test]
    fn test_metadata_matches_names() {
        let registry = ToolRegistry::new(test_config());
        let names = registry.tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), names.len());
        for tool in tools {
            assert!(names.contains(&tool.name.as_ref()));
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_list_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let registry = ToolRegistry::new(test_config());
        let result = registry
            .call_tool(
                "list_directory",
                serde_json::json!({ "path": temp.path().to_string_lossy() }),
            )
            .await;
        assert!(result.is_ok());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_config());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
