use crate::commands::{run_apply, run_assess, ApplyArgs, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_eligibility::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Eligibility Service",
    about = "Assess applicants against assistance schemes and record application decisions",
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
    /// Print the eligibility report for a seeded applicant
    Assess(AssessArgs),
    /// Decide an application for a seeded applicant and scheme
    Apply(ApplyArgs),
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
        Command::Assess(args) => run_assess(args),
        Command::Apply(args) => run_apply(args),
    }
}
