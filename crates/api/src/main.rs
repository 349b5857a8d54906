use anyhow::Context;

use catalog_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration; refusing to start");
            return Err(e).context("invalid configuration");
        }
    };

    let app = catalog_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        node_id = %config.node_id,
        addr = %listener.local_addr()?,
        "catalog node listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
