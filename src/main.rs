use std::process::ExitCode;

use clap::Parser;
use quill::{AppState, Config, Database, Error, Server, logger};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    logger::init(config.log_filter.as_deref(), config.log_json);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("quill failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Error> {
    info!(addr = %config.addr, "starting quill");

    let db = Database::connect(&config.database_url, config.max_connections, config.sql_log).await?;
    db.migrate().await?;

    let state = AppState::new(db)?;
    Server::bind(config.addr).serve(quill::app(state)).await
}
