//! Command execution tools.
//!
//! Shared subprocess plumbing for the shell, interpreter, git, and container
//! tools: spawn, capture, wall-clock timeout. On timeout the child process is
//! killed; grandchildren spawned by the command are not reaped.

pub mod bash;
pub mod node;
pub mod python;

pub use bash::RunBashTool;
pub use node::RunNodeTool;
pub use python::RunPythonTool;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use rmcp::model::CallToolResult;
use tokio::process::Command;

use crate::core::config::Config;
use crate::core::security::validate_path;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{fail_text, ok_result};

/// Captured output of a finished subprocess.
pub(crate) struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Render the captured streams as labeled sections, skipping empty ones.
    pub fn sections(&self, stdout_label: &str, stderr_label: &str) -> String {
        let mut parts = Vec::new();
        if !self.stdout.is_empty() {
            parts.push(format!("{}:\n{}", stdout_label, self.stdout));
        }
        if !self.stderr.is_empty() {
            parts.push(format!("{}:\n{}", stderr_label, self.stderr));
        }
        parts.join("\n\n")
    }
}

/// Run a prepared command, waiting up to `timeout` for it to finish.
///
/// `descriptor` names the command in the timeout message. `kill_on_drop`
/// ensures the child is SIGKILLed when the timed-out future is dropped.
pub(crate) async fn run_command(
    mut cmd: Command,
    program: &str,
    descriptor: &str,
    timeout: Option<Duration>,
) -> Result<CommandOutput, ToolError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| ToolError::spawn(program.to_string(), e))?;

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ToolError::timeout(limit.as_secs(), descriptor.to_string()))?,
        None => child.wait_with_output().await,
    };

    let output =
        waited.map_err(|e| ToolError::io(format!("Error waiting for {}", program), e))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Validate a working-directory argument: must exist, be a directory, and
/// satisfy the path security policy.
pub(crate) fn resolve_cwd(cwd: &str, config: &Config) -> Result<PathBuf, ToolError> {
    let dir = validate_path(cwd, config)?;
    if !dir.is_dir() {
        return Err(ToolError::NotADirectory(dir));
    }
    Ok(dir)
}

/// Turn a finished command into the marker-prefixed report.
///
/// `✓ <headline>` with labeled output sections on exit 0,
/// `✗ (exit N) <headline>` otherwise.
pub(crate) fn exec_report(
    headline: &str,
    output: &CommandOutput,
    stdout_label: &str,
    stderr_label: &str,
) -> CallToolResult {
    let sections = output.sections(stdout_label, stderr_label);
    let body = if sections.is_empty() {
        headline.to_string()
    } else {
        format!("{}\n\n{}", headline, sections)
    };

    if output.success() {
        ok_result(body)
    } else {
        fail_text(format!("(exit {}) {}", output.exit_code, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_sections_skips_empty_streams() {
        let out = output("hi\n", "", 0);
        assert_eq!(out.sections("STDOUT", "STDERR"), "STDOUT:\nhi\n");

        let out = output("", "", 0);
        assert_eq!(out.sections("STDOUT", "STDERR"), "");

        let out = output("a", "b", 0);
        assert_eq!(out.sections("OUTPUT", "ERRORS"), "OUTPUT:\na\n\nERRORS:\nb");
    }

    #[test]
    fn test_exec_report_markers() {
        use crate::domains::tools::definitions::common::result_text;

        let ok = exec_report("Executed: true", &output("", "", 0), "STDOUT", "STDERR");
        assert_eq!(result_text(&ok), "✓ Executed: true");

        let failed = exec_report("Executed: exit 7", &output("", "", 7), "STDOUT", "STDERR");
        assert_eq!(result_text(&failed), "✗ (exit 7) Executed: exit 7");
        assert!(failed.is_error.unwrap_or(false));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_command_captures_streams() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2");

        let output = run_command(cmd, "sh", "echo", None).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_command_timeout() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 5");

        let result = run_command(cmd, "sh", "sleep 5", Some(Duration::from_millis(100))).await;
        match result {
            Err(ToolError::Timeout { command, .. }) => assert_eq!(command, "sleep 5"),
            other => panic!("expected timeout, got {:?}", other.map(|o| o.exit_code)),
        }
    }

    #[tokio::test]
    async fn test_run_command_spawn_failure() {
        let cmd = Command::new("definitely-not-a-real-program-12345");
        let result = run_command(cmd, "definitely-not-a-real-program-12345", "x", None).await;
        assert!(matches!(result, Err(ToolError::Spawn { .. })));
    }

    #[test]
    fn test_resolve_cwd_rejects_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();

        let config = Config::default();
        let result = resolve_cwd(file.to_str().unwrap(), &config);
        assert!(matches!(result, Err(ToolError::NotADirectory(_))));
    }

    #[test]
    fn test_resolve_cwd_nonexistent() {
        let config = Config::default();
        let result = resolve_cwd("/nonexistent/cwd/12345", &config);
        assert!(result.is_err());
    }
}
