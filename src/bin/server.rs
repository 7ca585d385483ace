use faturamento::{api, core::config::FaturamentoConfig, FaturamentoService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = FaturamentoConfig::from_env()?;
    let service = Arc::new(FaturamentoService::from_config(&config));
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
