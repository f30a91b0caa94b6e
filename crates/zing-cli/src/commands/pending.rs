use clap::Subcommand;
use zing_core::storage::pending_queue_path;
use zing_core::{Config, PendingConfirmations};

use super::{coordinator, runtime, CliResult};

#[derive(Subcommand)]
pub enum PendingAction {
    /// List queued confirmations as JSON
    List,
    /// Retry every queued confirmation once
    Flush,
}

pub fn run(action: PendingAction) -> CliResult {
    match action {
        PendingAction::List => {
            let queue = PendingConfirmations::open(pending_queue_path()?)?;
            println!("{}", serde_json::to_string_pretty(&queue.entries())?);
        }
        PendingAction::Flush => {
            let config = Config::load()?;
            if !config.reconcile.retry_failed {
                return Err("retry queue is disabled; set reconcile.retry_failed = true".into());
            }
            let mut coordinator = coordinator(&config)?;
            let summary = runtime()?.block_on(coordinator.flush_pending())?;
            println!(
                "{}",
                serde_json::json!({
                    "confirmed": summary.confirmed,
                    "still_pending": summary.still_pending,
                })
            );
        }
    }
    Ok(())
}
