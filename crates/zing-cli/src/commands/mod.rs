pub mod config;
pub mod pending;
pub mod read;
pub mod rewards;

use zing_core::storage::pending_queue_path;
use zing_core::{Config, HttpRewardStore, PendingConfirmations, ReconciliationCoordinator};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Current-thread runtime for the commands that talk to the store.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

pub fn http_store(config: &Config) -> Result<HttpRewardStore, Box<dyn std::error::Error>> {
    Ok(HttpRewardStore::new(
        &config.server.base_url,
        config.server.request_timeout(),
    )?)
}

/// Coordinator for the signed-in user, with the on-disk retry queue when
/// `reconcile.retry_failed` is set.
pub fn coordinator(
    config: &Config,
) -> Result<ReconciliationCoordinator<HttpRewardStore>, Box<dyn std::error::Error>> {
    let username = config.server.require_username()?;
    let coordinator = ReconciliationCoordinator::new(http_store(config)?, username);
    if config.reconcile.retry_failed {
        let queue = PendingConfirmations::open(pending_queue_path()?)?;
        return Ok(coordinator.with_retry_queue(queue));
    }
    Ok(coordinator)
}
