use lucia::config::AppConfig;
use lucia::error::StartupError;
use lucia::routes::configure_routes;
use lucia::state::AppState;
use lucia::telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let routes = configure_routes(state);

    info!(
        port = config.port,
        model = %config.gemini_model,
        "server listening on 0.0.0.0:{}",
        config.port
    );
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
