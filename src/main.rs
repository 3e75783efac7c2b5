//! PriceHawk service binary.
//!
//! Loads settings, wires stores, vendors and the worker pool, then serves
//! the REST API until Ctrl-C.

use anyhow::{Context, Result};
use pricehawk::api::rest::{AppState, create_router};
use pricehawk::application::services::{AggregationService, TrackingService, WorkerPool};
use pricehawk::config::Settings;
use pricehawk::infrastructure::persistence::in_memory::{
    InMemoryHistoryLog, InMemorySnapshotStore, InMemoryTrackedProductStore,
};
use pricehawk::infrastructure::persistence::postgres::{
    PostgresHistoryLog, PostgresSnapshotStore, PostgresTrackedProductStore, ensure_schema,
};
use pricehawk::infrastructure::persistence::{HistoryLog, SnapshotStore, TrackedProductStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
const DB_MAX_CONNECTIONS: u32 = 10;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pricehawk=info,tower_http=info"));
    let json = std::env::var("PRICEHAWK_LOG_JSON").is_ok_and(|v| v == "1");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

struct Stores {
    snapshots: Arc<dyn SnapshotStore>,
    history: Arc<dyn HistoryLog>,
    tracked: Arc<dyn TrackedProductStore>,
}

async fn stores(settings: &Settings) -> Result<Stores> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database_url configured; snapshots, history and tracked products are kept in memory");
        return Ok(Stores {
            snapshots: Arc::new(InMemorySnapshotStore::new()),
            history: Arc::new(InMemoryHistoryLog::new()),
            tracked: Arc::new(InMemoryTrackedProductStore::new()),
        });
    };

    let pg = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .connect(url)
        .await
        .context("connecting to postgres")?;
    ensure_schema(&pg).await.context("creating schema")?;
    info!("using postgres stores");
    Ok(Stores {
        snapshots: Arc::new(PostgresSnapshotStore::new(pg.clone())),
        history: Arc::new(PostgresHistoryLog::new(pg.clone())),
        tracked: Arc::new(PostgresTrackedProductStore::new(pg)),
    })
}

fn build_service(
    settings: &Settings,
    pool: WorkerPool,
    stores: &Stores,
) -> Result<AggregationService> {
    let clients = settings.vendor_clients()?;
    let profiles = settings.vendor_profiles()?;
    if clients.is_empty() {
        warn!("no vendors enabled; every query will be answered from cache or fallback");
    }

    let mut service = AggregationService::new(
        &settings.aggregation,
        pool,
        clients,
        profiles,
        Arc::clone(&stores.snapshots),
        Arc::clone(&stores.history),
    );
    if let Some(source) = settings.enrichment_source()? {
        service = service.with_enrichment(source);
    }
    Ok(service)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutdown requested");
}

async fn serve(settings: Settings) -> Result<()> {
    let pool = WorkerPool::new(settings.worker_pool)?;
    let stores = stores(&settings).await?;
    let service = build_service(&settings, pool.clone(), &stores)?;
    let tracking = TrackingService::new(Arc::clone(&stores.tracked));
    info!(
        vendors = service.vendor_count(),
        max_workers = settings.worker_pool.max_workers,
        queue_capacity = settings.worker_pool.queue_capacity,
        deadline_ms = settings.aggregation.overall_deadline_ms,
        fallback = settings.aggregation.fallback_enabled,
        "aggregation service ready"
    );

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    let router = create_router(Arc::new(AppState::new(service, tracking)));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if !pool.shutdown(SHUTDOWN_GRACE).await {
        warn!("exiting with background writes still pending");
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config_path = std::env::var("PRICEHAWK_CONFIG").ok();
    let settings = Settings::load(config_path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(settings.worker_pool.core_workers)
        .thread_name("pricehawk-worker")
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(serve(settings))
}
