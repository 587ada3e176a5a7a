use anyhow::Context;

use policypath_backend::core::{config::Settings, logging};
use policypath_backend::server::router;
use policypath_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("loading configuration")?;
    logging::init(&settings.log_dir);

    let state = AppState::initialize(settings).await?;

    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router::router(state))
        .await
        .context("server error")?;

    Ok(())
}
