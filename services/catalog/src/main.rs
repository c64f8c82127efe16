//! Catalog Service 入口

use std::sync::Arc;

use axum::routing::get;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use catalog::api::http::{AppState, router};
use catalog::application::{CatalogApp, CatalogDeps, CatalogSettings};
use catalog::infrastructure::cache::LocalCache;
use catalog::infrastructure::events::LoggingEventPublisher;
use catalog::infrastructure::notification::EventVendorNotifier;
use catalog::infrastructure::persistence::{InMemoryProductRepository, InMemoryUserRoleRepository};
use vnm_adapter_redis::{RedisCache, RedisEventPublisher, check_connection, create_connection_manager};
use vnm_auth_core::TokenService;
use vnm_config::{AppConfig, CacheBackend};
use vnm_ports::{CachePort, EventPublisher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    vnm_telemetry::init(&config.telemetry.log_level, config.telemetry.json);
    let prometheus = if config.telemetry.metrics {
        let handle = vnm_telemetry::init_metrics()?;
        info!("Prometheus recorder installed");
        Some(handle)
    } else {
        None
    };

    info!(app = %config.app_name, env = %config.app_env, "Starting catalog service");

    let settings = CatalogSettings::from_config(&config);
    let local_cache: Arc<dyn CachePort> = Arc::new(LocalCache::new(config.cache.max_capacity));

    let (cache, publisher): (Arc<dyn CachePort>, Arc<dyn EventPublisher>) = match &config.redis {
        Some(redis) => {
            let mut conn = create_connection_manager(redis.url.expose_secret()).await?;
            check_connection(&mut conn).await?;
            info!(channel = %redis.event_channel, "Connected to Redis");

            let cache: Arc<dyn CachePort> = match config.cache.backend {
                CacheBackend::Redis => Arc::new(RedisCache::new(conn.clone(), config.app_name.clone())),
                CacheBackend::Local => local_cache,
            };
            (cache, Arc::new(RedisEventPublisher::new(conn)))
        }
        None => (local_cache, Arc::new(LoggingEventPublisher)),
    };

    let notifier = Arc::new(EventVendorNotifier::new(publisher.clone(), &settings.event_topic));
    let deps = CatalogDeps {
        products: Arc::new(InMemoryProductRepository::new()),
        user_roles: Arc::new(InMemoryUserRoleRepository::new()),
        cache,
        publisher,
        notifier,
    };
    let app = Arc::new(CatalogApp::new(deps, settings));

    let tokens = TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    );
    let mut router = router(AppState::new(app, tokens));
    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }
    let router = router.layer(TraceLayer::new_for_http());

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Catalog HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
