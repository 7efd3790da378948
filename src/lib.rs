mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod intake;
mod routes;
mod server;
pub mod telemetry;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
