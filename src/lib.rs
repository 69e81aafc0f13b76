#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod host;
pub mod logging;
pub mod permissions;
pub mod player;
pub mod session;
pub mod vault;
