use todo_api::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "todo_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let (app_state, pg) = AppState::init(config).await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(pg.pool()).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let addr = app_state.config.listen_addr()?;
    let store = app_state.store.clone();
    let result = app::serve(app::build_app(app_state), addr).await;
    store.close().await;
    result
}
