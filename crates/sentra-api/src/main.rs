//! sentra-api binary: configuration, wiring, and serving.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::Context;
use governor::{Quota, RateLimiter};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentra_api::{app, AppState};
use sentra_core::IdentityVerifier;
use sentra_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Keep the non-blocking writer guard alive for the process
    // lifetime when file logging is enabled.
    let _log_guard = init_tracing();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .context("PORT must be a valid port number")?;

    // The engine credential is mandatory: without it the transition
    // surface would be unreachable and jobs could never progress.
    let engine_token =
        std::env::var("ENGINE_TOKEN").context("ENGINE_TOKEN must be set")?;

    let db = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            info!("Connecting to database...");
            let db = Database::connect(&url).await?;
            info!("Database connected");
            db
        }
        Err(_) => {
            warn!("DATABASE_URL not set; using volatile in-memory store");
            Database::in_memory()
        }
    };

    let verifier: Arc<dyn IdentityVerifier> = match std::env::var("IDENTITY_URL") {
        Ok(url) => {
            info!("Identity verifier: {url}");
            Arc::new(sentra_api::auth::HttpIdentityVerifier::new(url))
        }
        Err(_) => {
            let spec = std::env::var("AUTH_TOKENS").unwrap_or_default();
            if spec.is_empty() {
                warn!("Neither IDENTITY_URL nor AUTH_TOKENS set; all user requests will be rejected");
            }
            Arc::new(sentra_api::auth::StaticTokenVerifier::from_spec(&spec)?)
        }
    };

    // Rate limiting configuration
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60)
    let rate_limit_requests: u32 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .context("Rate limit period must be non-zero")?
            .allow_burst(
                NonZeroU32::new(rate_limit_requests).context("Rate limit must be non-zero")?,
            );
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };
    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled { "enabled" } else { "disabled" },
        rate_limit_requests,
        rate_limit_period_secs
    );

    let state = AppState {
        db,
        verifier,
        engine_token,
        rate_limiter,
    };

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("invalid HOST/PORT")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Initialize tracing from the environment.
///
/// `RUST_LOG` controls filtering, `LOG_FORMAT=json` switches to JSON
/// output, `LOG_DIR` adds a daily-rolling file writer.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    if let Ok(dir) = std::env::var("LOG_DIR") {
        let file_appender = tracing_appender::rolling::daily(dir, "sentra-api.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        if json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if json {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
        None
    }
}
