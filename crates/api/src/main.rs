use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    productapi_observability::init();

    let config = productapi_api::config::AppConfig::from_env()?;

    let app = productapi_api::app::build_app(&config)
        .await
        .context("failed to initialise product store")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
