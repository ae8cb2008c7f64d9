use std::process::ExitCode;
use std::sync::Arc;

use infocenter::broker::Broker;
use infocenter::config::load_config;
use infocenter::transport::http::{AppState, serve};
use infocenter::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log.level);

    let addr = config.server.listen_addr();
    let broker = Arc::new(Broker::new(config.broker.clone()));
    let state = AppState::new(broker);

    tokio::select! {
        res = serve(&addr, state, &config.server.route_prefix) => {
            if let Err(e) = res {
                error!("Server failed on {addr}: {e}");
                return ExitCode::FAILURE;
            }
            error!("Server exited unexpectedly.");
            ExitCode::FAILURE
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            ExitCode::SUCCESS
        }
    }
}
