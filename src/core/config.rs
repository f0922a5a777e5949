//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,

    /// Command execution policy.
    pub exec: ExecConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for path operations.
    /// If None, no path restrictions are enforced.
    /// All file system operations will be validated against this root.
    pub root_path: Option<PathBuf>,

    /// Whether to allow symlinks in path validation.
    /// If true, symlinks are followed and their targets are validated.
    /// If false, symlinks pointing outside the root are rejected.
    pub allow_symlinks: bool,
}

/// Command execution policy.
///
/// Wall-clock timeouts for subprocess tools. These are the only resource
/// limits the server imposes; command content itself is unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Default timeout for `run_bash` when the call does not specify one.
    pub bash_timeout_secs: u64,

    /// Timeout for interpreter runners (`run_python`, `run_node`) and
    /// `docker_exec`.
    pub runner_timeout_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            // No root path restriction by default
            root_path: None,
            // Allow symlinks by default with validation
            allow_symlinks: true,
        }
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            bash_timeout_secs: 300,
            runner_timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "devkit-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            exec: ExecConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_ROOT_PATH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Load security configuration
        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!(
                "Path security enabled: root directory set to {:?}",
                config.security.root_path
            );
        } else {
            warn!(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 All filesystem paths will be allowed."
            );
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        // Load execution policy
        if let Ok(timeout) = std::env::var("MCP_BASH_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                config.exec.bash_timeout_secs = secs;
            }
        }

        if let Ok(timeout) = std::env::var("MCP_RUNNER_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                config.exec.runner_timeout_secs = secs;
            }
        }

        config
    }
}
