pub mod bulletin;
pub mod commands;
pub mod core;
pub mod providers;
pub mod soap;
pub mod xml;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::{
    bulletin::BulletinPublisher,
    core::{
        config::AppConfig,
        errors::{AppError, AppResult},
    },
    providers::nckvs::{KvsClient, RecordStore},
};

const LOG_ENV: &str = "PUBLICCOMMONS_LOG";

fn log_filter(config_level: Option<&str>) -> EnvFilter {
    let level = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config_level.map(ToString::to_string))
        .unwrap_or_else(|| "info".to_string())
        .to_ascii_lowercase();
    EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(config_level: Option<&str>) {
    // A subscriber may already be installed by an embedding process or a test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(config_level))
        .try_init();
}

pub struct AppState<S = KvsClient> {
    pub publisher: Arc<BulletinPublisher<S>>,
    pub service_location: String,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
            service_location: self.service_location.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: RecordStore,
{
    pub fn new(store: S, service_location: impl Into<String>) -> Self {
        Self {
            publisher: Arc::new(BulletinPublisher::new(store)),
            service_location: service_location.into(),
        }
    }
}

pub async fn run() -> AppResult<()> {
    let (config, config_path) = AppConfig::load()?;
    init_logging(config.log.level.as_deref());

    let addr = config.server.socket_addr()?;
    let client = KvsClient::new(&config.nckvs)?;
    let state = AppState::new(client, format!("http://{addr}/"));
    let router = commands::build_router(state, config.server.max_content_length);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        config = %config_path.display(),
        store = %config.nckvs.base_url,
        datatype = %config.nckvs.datatypename,
        "listening to http://{addr}, wsdl is at http://{addr}/?wsdl"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Io(err.to_string()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
