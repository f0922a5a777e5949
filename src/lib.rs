//! Developer toolbox MCP server library.
//!
//! This crate implements a Model Context Protocol (MCP) server that exposes
//! a set of developer tools to clients: file I/O, text search, shell and
//! interpreter execution, git operations, container control, and a system
//! metrics snapshot.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   path security, transports, and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: the tool definitions, registry, and router
//!
//! Every tool is a stateless handler: it validates its arguments, performs
//! one filesystem or subprocess action, and returns a marker-prefixed text
//! report. The tool table is built once at server construction and is
//! immutable afterwards.
//!
//! # Example
//!
//! ```rust,no_run
//! use devkit_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
