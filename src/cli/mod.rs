pub mod import;
pub mod list;

use clap::{Parser, Subcommand};

/// mapforge - idTech decl importer and map exporter
#[derive(Parser, Debug)]
#[command(name = "mapforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import material and entity decls from a game directory
    Import(import::ImportArgs),

    /// List imported decls
    List(list::ListArgs),
}
