//! Forum CLI entry point

use clap::Parser;
use tracing::error;

use forum_cli::{app::ForumApp, cli::Cli, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_configuration(&cli)?;
    setup_logging(cli.verbose || config.cli.verbose);

    // Override session location if a data directory was given
    if let Some(data_dir) = &cli.data_dir {
        config.client.session_file = data_dir.join("session.json");
    }

    let app = ForumApp::new(config);
    if let Err(e) = app.run(cli.command).await {
        error!("command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();
}

fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load(cli.config.as_deref())
}
