use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use async_options::cli::{self, Cli};
use async_options::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(database) = cli.database {
        config.database = Some(database);
    }

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(log_file) = &config.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    info!("Starting options-cli");
    debug!("Config: {:?}", config);

    cli::run(cli.command, &config).await
}
