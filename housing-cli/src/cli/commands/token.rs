use anyhow::Result;
use colored::*;

use crate::api::{Role, issue_token};
use crate::config::Settings;

/// Print a signed token. The token goes to stdout on its own line so it can
/// be captured by scripts; the note goes to stderr.
pub fn handle_token_command(settings: &Settings, subject: &str, role: Role) -> Result<()> {
    if settings.uses_default_secret() {
        eprintln!(
            "{} signed with the default key; set HOUSING_SECRET_KEY for real deployments",
            "warning:".bright_yellow()
        );
    }

    let token = issue_token(
        &settings.secret_key,
        subject,
        role,
        settings.token_expire_minutes,
    )?;
    eprintln!(
        "Token for {} ({:?}), valid {} minutes:",
        subject.bold(),
        role,
        settings.token_expire_minutes
    );
    println!("{}", token);
    Ok(())
}
