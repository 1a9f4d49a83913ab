use anyhow::Context;
use dotenvy::dotenv;
use userdesk::logging::init_tracing;
use userdesk::router::init_router;
use userdesk::state::init_app_state;
use userdesk_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let state = init_app_state(&config)
        .await
        .context("Failed to initialize application state")?;
    let app = init_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server running on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
