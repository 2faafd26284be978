//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::Role;
use crate::import::EntityKind;

#[derive(Parser)]
#[command(name = "housing")]
#[command(about = "Community and property records with spreadsheet import/export")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/housing/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overriding the settings
        #[arg(long)]
        bind: Option<String>,
    },
    /// Import a spreadsheet into the database
    Import {
        kind: EntityKind,
        file: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a blank import template
    Template {
        kind: EntityKind,
        /// Output path (defaults to the template's standard file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export every stored record of a kind
    Export {
        kind: EntityKind,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Issue a bearer token for the API
    Token {
        #[arg(long)]
        subject: String,
        #[arg(long, value_enum, default_value_t = Role::Viewer)]
        role: Role,
    },
}
