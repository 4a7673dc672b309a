mod calculator;
mod cli;
mod infra;
mod routes;
mod server;

use showroom::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
