use forum::{AppState, Config, app, store::run_session_sweeper};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum=debug,tower_http=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let addr = config.addr();
    let sweep_interval = config.sweep_interval_secs;

    let state = AppState::new(config);
    tokio::spawn(run_session_sweeper(state.sessions.clone(), sweep_interval));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Routes:");
    info!("  GET  /health        - Health check");
    info!("  GET  /              - Homepage");
    info!("  GET  /register      - Registration form");
    info!("  POST /register      - Create account");
    info!("  GET  /login         - Login form");
    info!("  POST /login         - Start session");
    info!("  POST /logout        - End session");
    info!("  GET  /comments      - Comment board");
    info!("  POST /comments      - Post comment (login required)");
    info!("  GET  /comment/new   - New comment form");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
