use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::InMemoryCandidateStore;
use crate::intake::{Candidate, CandidateIntakeService, CandidateSubmission, ValidationPolicy};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Candidate Intake",
    about = "Validate and persist candidate submissions for the applicant tracking workflow",
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
    /// Run a single submission through intake and print the stored candidate
    Intake(IntakeArgs),
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

#[derive(Args, Debug)]
pub(crate) struct IntakeArgs {
    /// JSON file containing a candidate submission
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Intake(args) => {
            let config = AppConfig::load()?;
            let submission = read_submission(&args.file)?;
            let candidate =
                run_intake(&submission, ValidationPolicy::from(&config.intake)).await?;
            println!("{}", serde_json::to_string_pretty(&candidate)?);
            Ok(())
        }
    }
}

/// Decode a JSON submission file. Blocking read; only the one-shot `intake` command calls it.
pub(crate) fn read_submission(path: &Path) -> Result<CandidateSubmission, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Add a submission against a fresh in-memory store.
pub(crate) async fn run_intake(
    submission: &CandidateSubmission,
    policy: ValidationPolicy,
) -> Result<Candidate, AppError> {
    let service =
        CandidateIntakeService::new(Arc::new(InMemoryCandidateStore::default()), policy);
    Ok(service.add_candidate(submission).await?)
}
