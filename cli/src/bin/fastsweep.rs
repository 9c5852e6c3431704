use clap::Parser;
use fastsweep::utils::logging;
use fastsweep_cli::{commands, Cli, Command};

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Discover(args) => commands::discover(&args),
        Command::Generate(args) => commands::generate(&args),
        Command::Run(args) => commands::run(&args).await,
    }
}
