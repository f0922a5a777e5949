//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own
//! route. The router is built once at server construction and is immutable
//! afterwards.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{
    DeletePathTool, DockerExecTool, DockerPsTool, DockerRunTool, GitCommitTool, GitDiffTool,
    GitStatusTool, ListDirectoryTool, ReadFileTool, RunBashTool, RunNodeTool, RunPythonTool,
    SearchFilesTool, SystemInfoTool, WriteFileTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(ReadFileTool::create_route(config.clone()))
        .with_route(WriteFileTool::create_route(config.clone()))
        .with_route(ListDirectoryTool::create_route(config.clone()))
        .with_route(SearchFilesTool::create_route(config.clone()))
        .with_route(DeletePathTool::create_route(config.clone()))
        .with_route(RunBashTool::create_route(config.clone()))
        .with_route(RunPythonTool::create_route(config.clone()))
        .with_route(RunNodeTool::create_route(config.clone()))
        .with_route(GitStatusTool::create_route(config.clone()))
        .with_route(GitCommitTool::create_route(config.clone()))
        .with_route(GitDiffTool::create_route(config.clone()))
        .with_route(DockerRunTool::create_route(config.clone()))
        .with_route(DockerPsTool::create_route(config.clone()))
        .with_route(DockerExecTool::create_route(config))
        .with_route(SystemInfoTool::create_route())
}
