/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → CognitoAuth 生成 → Router 組み立て
 * - Middleware の適用 (CORS / request-id / trace / timeout)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::build_cognito_auth;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set. Ex:
    // RUST_LOG=info,cognito_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash immediately. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    // Missing Cognito coordinates abort startup here.
    let config = Config::from_env().context("failed to load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        region = %config.auth.region,
        user_pool_id = %config.auth.user_pool_id,
        header = %config.auth.header_name,
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let auth = build_cognito_auth(&config.auth).context("failed to build cognito verifier")?;
    let state = AppState::new(auth);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.request_timeout)
}
