use anyhow::Result;
use clap::Parser;
use countries::cli::{Cli, CliHandler};
use countries::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path()?;
    // `config init` must be able to overwrite a file that no longer loads
    let mut config = if cli.writes_config() {
        AppConfig::default()
    } else {
        AppConfig::load_from_file(&config_path).await?
    };
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
        config.validate()?;
    }

    // Set log level based on debug flag, logs go to stderr so output stays pipeable
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();

    if cli.debug {
        tracing::debug!("Debug mode enabled, config from {}", config_path.display());
    }

    let handler = CliHandler::new(config, config_path);
    handler.handle_command(cli.command).await
}
