use fitfusion::{
    app::{build_app, serve},
    config::AppConfig,
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = AppConfig::from_env()?;
    tracing::info!(env = ?config.env, require_auth = config.require_auth, "starting FitFusion API");
    let (host, port) = (config.host.clone(), config.port);

    let state = AppState::init(config).await?;
    serve(build_app(state), &host, port).await
}
