//! Avatar Studio CLI
//!
//! Command-line interface for the avatar feature model.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use avatar_studio::cli::{commands, Cli, Commands};
use avatar_studio::StudioConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StudioConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StudioConfig::load().context("loading default config")?,
    };

    let default_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    info!("Avatar Studio v{}", avatar_studio::VERSION);

    match cli.command {
        Some(Commands::Defaults) => commands::defaults()?,
        Some(Commands::Compose {
            set,
            from,
            include_hidden,
        }) => commands::compose(&config, &set, from.as_deref(), include_hidden)?,
        Some(Commands::Save { name, set }) => commands::save(&config, &name, &set)?,
        Some(Commands::List) => commands::list(&config)?,
        Some(Commands::Show { id }) => commands::show(&config, &id)?,
        None => {
            println!("Avatar Studio v{}", avatar_studio::VERSION);
            println!("Use --help for available commands");
        }
    }

    Ok(())
}
