use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use ra_common::{
    config::SearchConfig,
    logging::{init_tracing_subscriber, install_tracing_panic_hook},
    matching::{EquivalenceTable, TenantGate},
    repository::{RecordRepository, Snapshot, SnapshotRepository},
    search::{SearchEngine, SearchService},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod handlers;
mod router;

pub use config::AppConfig;
pub use router::create_router;

use config::Cli;
use error::ApiError;

/// readiness を落としてから接続を閉じ始めるまでの猶予
const READINESS_DRAIN: Duration = Duration::from_millis(200);

#[derive(Clone)]
pub struct AppState {
    pub service: SearchService,
    pub config: AppConfig,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(repo: Arc<dyn RecordRepository>, engine: SearchEngine, config: AppConfig) -> SharedState {
        Arc::new(Self {
            service: SearchService::new(repo, engine),
            config,
            readiness: Arc::new(AtomicBool::new(true)),
        })
    }
}

/// 組み込みの資格同等表とゲートなしの設定で、スナップショットを検索する状態
pub fn test_state_with(snapshot: Snapshot) -> SharedState {
    AppState::new(
        Arc::new(SnapshotRepository::from_snapshot(snapshot)),
        SearchEngine::new(EquivalenceTable::builtin(), TenantGate::default()),
        AppConfig::for_tests(),
    )
}

pub fn test_state() -> SharedState {
    test_state_with(Snapshot::default())
}

async fn open_repository(config: &AppConfig) -> Result<SnapshotRepository, ApiError> {
    match &config.snapshot_path {
        Some(path) => Ok(SnapshotRepository::from_path(path).await?),
        None => {
            warn!("RA_SNAPSHOT_PATH is not set, searches will return nothing");
            Ok(SnapshotRepository::default())
        }
    }
}

pub async fn run() -> Result<(), ApiError> {
    dotenvy::dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let config = AppConfig::from_cli(Cli::parse())?;
    let search_config = SearchConfig::from_env();
    let engine = SearchEngine::from_config(&search_config)?;
    let repo = open_repository(&config).await?;

    if let Some(port) = config.metrics_port {
        ra_metrics::init_metrics(port);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(Arc::new(repo), engine, config);
    let listener = TcpListener::bind(addr).await?;

    info!(
        %addr,
        environment = search_config.environment.as_ref(),
        qualification_pairs = state.service.engine().table().pair_count(),
        "ra-api listening"
    );

    axum::serve(listener, create_router(Arc::clone(&state)))
        .with_graceful_shutdown(wait_for_shutdown(state))
        .await?;

    info!("ra-api stopped");
    Ok(())
}

async fn wait_for_shutdown(state: SharedState) {
    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received ctrl-c"),
        _ = sigterm => info!("received SIGTERM"),
    }

    state.readiness.store(false, Ordering::SeqCst);
    tokio::time::sleep(READINESS_DRAIN).await;
}
