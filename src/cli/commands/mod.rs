//! One module per CLI subcommand.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod limit;
pub mod open;
pub mod pages;
pub mod pvault;
pub mod vault;
