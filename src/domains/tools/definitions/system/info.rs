//! System info tool definition.
//!
//! Snapshot of CPU, memory, and disk utilization via `sysinfo`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};
use tracing::{info, instrument};

use crate::domains::tools::definitions::common::report_result;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the system info tool (none).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SystemInfoParams {}

// ============================================================================
// Tool Definition
// ============================================================================

/// System info tool - CPU/RAM/disk utilization snapshot.
///
/// CPU sampling needs two refreshes separated by the minimum update interval,
/// so `execute` blocks briefly; the route runs it on the blocking pool.
pub struct SystemInfoTool;

impl SystemInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_system_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get a system utilization snapshot: CPU, RAM, and disk usage.";

    /// Execute the tool logic (for STDIO/TCP transport via rmcp).
    #[instrument(skip_all)]
    pub fn execute(_params: &SystemInfoParams) -> CallToolResult {
        info!("System info tool called");

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let cpu_percent = sys.global_cpu_usage();

        let mem_total = sys.total_memory();
        let mem_used = sys.used_memory();
        let mem_percent = percent(mem_used, mem_total);

        let disk_line = match root_disk_usage() {
            Some((used, total)) => format!(
                "Disk: {:.1}% ({:.1}GB / {:.1}GB)",
                percent(used, total),
                gb(used),
                gb(total)
            ),
            None => "Disk: unavailable".to_string(),
        };

        report_result(format!(
            "System Info:\nCPU Usage: {:.1}%\nRAM: {:.1}% ({:.1}GB / {:.1}GB)\n{}\n",
            cpu_percent,
            mem_percent,
            gb(mem_used),
            gb(mem_total),
            disk_line
        ))
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(_arguments: serde_json::Value) -> Result<serde_json::Value, String> {
        let result = tokio::task::spawn_blocking(|| Self::execute(&SystemInfoParams {}))
            .await
            .map_err(|e| format!("Task execution failed: {}", e))?;

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
            input_schema: cached_schema_for_type::<SystemInfoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: SystemInfoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                let result = tokio::task::spawn_blocking(move || Self::execute(&params))
                    .await
                    .map_err(|e| {
                        McpError::internal_error(format!("Task execution failed: {}", e), None)
                    })?;

                Ok(result)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

fn gb(bytes: u64) -> f64 {
    bytes as f64 / 1e9
}

/// Used/total bytes of the disk mounted at `/`, or the first listed disk.
fn root_disk_usage() -> Option<(u64, u64)> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.iter().next())?;

    let total = disk.total_space();
    let used = total.saturating_sub(disk.available_space());
    Some((used, total))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::result_text;

    #[test]
    fn test_system_info_report_shape() {
        let result = SystemInfoTool::execute(&SystemInfoParams {});
        assert!(result.is_error.is_none() || !result.is_error.unwrap());

        let text = result_text(&result);
        assert!(text.starts_with("System Info:"));
        assert!(text.contains("CPU Usage:"));
        assert!(text.contains("RAM:"));
        assert!(text.contains("Disk:"));
        assert!(text.contains('%'));
    }

    #[test]
    fn test_percent_handles_zero_total() {
        assert_eq!(percent(10, 0), 0.0);
        assert!((percent(1, 2) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gb_conversion() {
        assert!((gb(2_000_000_000) - 2.0).abs() < 1e-9);
    }
}
