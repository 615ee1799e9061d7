use clap::Parser;
use mapforge::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import(args) => mapforge::cli::import::run(args)?,
        Commands::List(args) => mapforge::cli::list::run(args)?,
    }

    Ok(())
}
