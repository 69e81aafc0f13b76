//! Configuration: `playervaults.toml` settings.

pub mod settings;

pub use settings::Settings;
