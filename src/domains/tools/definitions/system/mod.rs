//! Host metrics tools.

pub mod info;

pub use info::SystemInfoTool;
