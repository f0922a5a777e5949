//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server. Tools are the only domain this server exposes.

pub mod tools;
