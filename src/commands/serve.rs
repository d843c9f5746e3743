use anyhow::Result;
use tokio::sync::broadcast;
use tracing::info;

use textsim::config::Config;
use textsim::server::HttpServer;

/// Run the comparison HTTP service until interrupted.
pub async fn run_server(config: Config) -> Result<()> {
    let service = super::build_service(&config)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, shutting down");
            let _ = shutdown_tx.send(());
        }
    });

    let server = HttpServer::new(config.http.clone(), service);
    server.run(shutdown_rx).await
}
