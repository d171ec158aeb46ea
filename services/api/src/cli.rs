use crate::commands::{run_calculate, run_facts, CalculateArgs, FactsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mortgage_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mortgage Advisor",
    about = "Serve the UAE mortgage advisor or run its calculations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a buy-vs-rent scenario and print the result
    Calculate(CalculateArgs),
    /// Show the knowledge base facts retrieved for a question
    Facts(FactsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Calculate(args) => run_calculate(args),
        Command::Facts(args) => run_facts(args),
    }
}
