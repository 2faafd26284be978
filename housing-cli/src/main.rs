mod api;
mod cli;
mod config;
mod excel;
mod export;
mod import;
mod records;

use clap::Parser;

use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    cli::commands::run(cli.command, settings).await
}
