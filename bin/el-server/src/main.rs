//! EntreLaunch Platform Server
//!
//! Production server for the platform REST APIs and background tasks:
//! - CRUD APIs: users (with cascade delete), subscriptions
//! - Payments API: hosted-payment checkout (when the gateway is configured)
//! - Background tasks: token cleanup, subscription cleanup, tombstone sweep,
//!   coordinated across instances by a Postgres advisory lock
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EL_CONFIG` | - | Path to config.toml |
//! | `EL_HTTP_PORT` | `8080` | HTTP API port |
//! | `EL_POSTGRES_URL` | - | Postgres connection string (mandatory) |
//! | `EL_JWT_SECRET` | - | HS256 bearer-token secret |
//! | `EL_DEV_MODE` | `false` | Seed a dev admin and log its token |
//! | `RUST_LOG` | `info` | Log level |

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use el_config::AppConfig;
use el_gateway::{GatewayClient, GatewayConfig, Region};
use el_platform::api::{payments_router, subscriptions_router, users_router, PaymentsState, UsersState};
use el_platform::seed::DevSeeder;
use el_platform::{
    AppState, AuthLayer, AuthService, CascadeDeleteService, CrudService, PermissionCache,
    PgRefreshTokenStore, PgRoleStore, PgSubscriptionStore, PgUserStore,
};
use el_tasks::tasks::{SubscriptionCleanupTask, TokenCleanupTask, TombstoneSweepTask};
use el_tasks::{PgLockService, PgTaskLogStore, TaskRunner, TaskRunnerConfig, TaskStatusService};

#[tokio::main]
async fn main() -> Result<()> {
    el_common::logging::init_logging("el-server");

    info!("Starting EntreLaunch Platform Server");

    // Configuration; a missing mandatory section aborts boot here
    let config = AppConfig::load().context("configuration is invalid")?;

    if config.auth.jwt_secret.is_empty() && !config.dev_mode {
        anyhow::bail!("auth.jwt_secret must be set outside dev mode");
    }

    // Database
    info!("Connecting to Postgres");
    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await
        .context("failed to connect to Postgres")?;

    el_platform::schema::init_schema(&pool).await?;

    // Metrics endpoint
    let metrics_addr: SocketAddr = format!("{}:{}", config.http.host, config.http.metrics_port)
        .parse()
        .context("invalid metrics address")?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .context("failed to install metrics exporter")?;

    // Auth & authorization
    let auth_service = Arc::new(AuthService::new(
        &config.auth.jwt_secret,
        &config.auth.issuer,
        config.auth.access_token_expiry_secs,
    ));
    let role_store = Arc::new(PgRoleStore::new(pool.clone()));
    let permission_cache = Arc::new(PermissionCache::new(role_store.clone()));

    if config.dev_mode {
        let seeder = DevSeeder::new(pool.clone());
        match seeder.seed(&auth_service).await {
            Ok(token) => info!(bearer = %token, "dev admin token issued"),
            Err(e) => warn!(error = %e, "dev data seeding failed"),
        }
    }

    // Repositories and services
    let retention_days = config.tasks.retention_days;
    let user_store = Arc::new(PgUserStore::new(pool.clone()));
    let user_service = Arc::new(CrudService::new(user_store, retention_days));
    let subscription_store = Arc::new(PgSubscriptionStore::new(pool.clone()));
    let subscription_service = Arc::new(CrudService::new(subscription_store.clone(), retention_days));
    let cascade = Arc::new(CascadeDeleteService::new(pool.clone(), retention_days));

    // Routers
    let mut api = Router::new()
        .nest(
            "/api/users",
            users_router(UsersState {
                service: user_service,
                cascade: cascade.clone(),
            }),
        )
        .nest("/api/subscriptions", subscriptions_router(subscription_service));

    if config.gateway.enabled {
        let region: Region = config.gateway.region.parse()?;
        let gateway_config = GatewayConfig::new(config.gateway.profile_id, &config.gateway.server_key)
            .with_client_key(&config.gateway.client_key)
            .with_region(region);
        let gateway = Arc::new(GatewayClient::new(gateway_config)?);
        api = api.nest(
            "/api/payments",
            payments_router(PaymentsState {
                gateway,
                currency: config.gateway.currency.clone(),
            }),
        );
        info!(region = %config.gateway.region, "payment gateway enabled");
    }

    let cors = if config.http.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .http
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
    };

    let app_state = AppState {
        auth_service: auth_service.clone(),
        permission_cache,
    };

    let app = api
        .route("/healthz", get(health))
        .layer(AuthLayer::new(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Background task runner
    let log_store = PgTaskLogStore::new(pool.clone());
    log_store.init_schema().await?;

    let mut runner = TaskRunner::new(
        TaskRunnerConfig {
            poll_interval: Duration::from_secs(config.tasks.poll_interval_secs),
            lock_key: config.tasks.lock_key.clone(),
        },
        PgLockService::new(pool.clone()),
        Arc::new(TaskStatusService::new()),
        log_store,
    );
    runner.register(Arc::new(TokenCleanupTask::new(
        Arc::new(PgRefreshTokenStore::new(pool.clone())),
        &config.tasks,
    )));
    runner.register(Arc::new(SubscriptionCleanupTask::new(
        subscription_store,
        &config.tasks,
    )));
    runner.register(Arc::new(TombstoneSweepTask::new(cascade, &config.tasks)));

    let runner = Arc::new(runner);
    runner.clone().start().await;

    // Serve
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    runner.shutdown();
    info!("Server stopped");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown signal received");
}
