use crate::demo::{run_evaluate, run_rates, EvaluateArgs, RatesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_feasibility::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "loan-feasibility",
    about = "Score French mortgage-loan applications and serve paid feasibility dossiers",
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
    /// Score an application file (or the built-in sample) and print the result
    Evaluate(EvaluateArgs),
    /// Print the current mortgage rate table
    Rates(RatesArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Rates(args) => run_rates(args),
    }
}
