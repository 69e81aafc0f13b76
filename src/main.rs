use clap::Parser;
use playervaults::cli::{Cli, Commands, Host};
use playervaults::config::Settings;

fn main() {
    let cli = Cli::parse();

    // Settings first: they carry the default log filter.
    let settings = match Settings::load(&cli.root) {
        Ok(s) => s,
        Err(e) => {
            playervaults::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };
    let filter = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    playervaults::logging::init_tracing(filter);

    let result = Host::with_settings(&cli, settings).and_then(|host| match cli.command {
        Commands::Vault {
            ref player,
            ref page,
            ref edits,
        } => playervaults::cli::commands::vault::execute(&host, player, page.as_deref(), edits),
        Commands::Pvault {
            ref admin,
            ref target,
            ref page,
            ref edits,
        } => playervaults::cli::commands::pvault::execute(
            &host,
            admin,
            target,
            page.as_deref(),
            edits,
        ),
        Commands::Limit { ref player } => playervaults::cli::commands::limit::execute(&host, player),
        Commands::Pages { ref player } => playervaults::cli::commands::pages::execute(&host, player),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            playervaults::cli::commands::audit_cmd::execute(&host, last, since.as_deref())
        }
    });

    if let Err(e) = result {
        playervaults::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
