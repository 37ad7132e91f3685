use product_catalog::infrastructure::{config::load_config, logger::Logger};
use product_catalog::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let _log_guard = Logger::init(&config.logging)?;

    let state = AppState::new(&config);
    let app = build_router(state, &config);

    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 product catalog listening on http://{}", addr);
    info!("📖 endpoints:");
    info!("   GET    /products                 - list (category, page, limit)");
    info!("   POST   /products                 - create");
    info!("   GET    /products/:id             - get");
    info!("   PUT    /products/:id             - update");
    info!("   DELETE /products/:id             - delete");
    info!("   GET    /products/search?name=    - search by name");
    info!("   GET    /products/stats/category  - count per category");
    info!("   GET    /health                   - health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown signal received");
}
