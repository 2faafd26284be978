//! Subcommand handlers

mod export;
mod import;
mod serve;
mod template;
mod token;

use anyhow::Result;

use crate::config::Settings;

use super::Commands;

pub async fn run(command: Commands, settings: Settings) -> Result<()> {
    match command {
        Commands::Serve { bind } => serve::handle_serve_command(settings, bind).await,
        Commands::Import { kind, file, json } => {
            import::handle_import_command(&settings, kind, &file, json).await
        }
        Commands::Template { kind, output } => template::handle_template_command(kind, output),
        Commands::Export { kind, output } => {
            export::handle_export_command(&settings, kind, output).await
        }
        Commands::Token { subject, role } => token::handle_token_command(&settings, &subject, role),
    }
}
