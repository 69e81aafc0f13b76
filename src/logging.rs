//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "PLAYERVAULTS_LOG";

/// Install a stderr `fmt` subscriber.
///
/// The filter comes from `PLAYERVAULTS_LOG` if set, otherwise from
/// `default_filter` (e.g. "info" or "playervaults=debug,warn").  Calling
/// this twice is harmless; the second call leaves the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init_tracing("debug");
        init_tracing("not a [valid filter");
        tracing::info!("tracing initialised");
    }
}
