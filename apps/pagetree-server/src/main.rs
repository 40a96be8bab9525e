//! Page hierarchy service entrypoint: wiring, not logic (§2, §6).
//!
//! Every module keeps its own domain and HTTP layer; this binary's job is
//! config, DI, middleware, and the listen/shutdown loop.

mod config;
mod ratelimit;
mod state;

use axum::Router;
use mimalloc::MiMalloc;
use pages::{PagesService, ServiceConfig};
use pagetree_auth::{AppEnv, TokenConfig};
use pagetree_db::{Db, PoolConfig};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use users::UsersService;

use config::ServerConfig;
use ratelimit::RateLimiterState;
use state::AppState;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env()?;
    let token_config = TokenConfig::from_env()?;
    let app_env = AppEnv::from_env();

    let db = Db::connect(&config.database_url, &PoolConfig::default()).await?;

    let pages_service = PagesService::new(db.clone(), ServiceConfig::default());
    let users_service = UsersService::new(db.clone(), token_config.clone(), app_env);
    let app_state = AppState::new(pages_service, users_service, token_config);

    let rate_limiter = RateLimiterState::new();
    rate_limiter.spawn_sweeper();

    let api = Router::new()
        .merge(pages::api::router())
        .merge(users::api::router())
        .route("/healthz", axum::routing::get(healthz))
        .with_state(app_state)
        .layer(axum::middleware::from_fn_with_state(rate_limiter, ratelimit::rate_limit))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http());

    let app = Router::new().nest("/api/v1", api);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tokio::time::timeout(config.shutdown_timeout, db.close()).await??;
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Resolves on SIGINT or SIGTERM, the same dual-signal graceful-shutdown
/// trigger the original listens for via `signal.Notify` (§5).
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler, shutdown will only respond to Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
