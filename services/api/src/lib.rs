mod cli;
mod infra;
mod register;
mod routes;
mod server;

use user_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
