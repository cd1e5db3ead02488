use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    ledger::{self, snapshot::Snapshot},
    store::ledger_store::LedgerStore,
    utils::clock::Clock,
};

/// Produces one [Snapshot] per tick. The pass runs to completion before the
/// next tick is awaited, so refreshes never overlap even when a pass takes
/// longer than the interval.
pub struct RefreshModule<S> {
    next: mpsc::Sender<Snapshot>,
    store: S,
    shutdown: CancellationToken,
    refresh_interval: Duration,
    clock: Box<dyn Clock>,
    last: Option<Snapshot>,
}

impl<S: LedgerStore> RefreshModule<S> {
    pub fn new(
        next: mpsc::Sender<Snapshot>,
        store: S,
        shutdown: CancellationToken,
        refresh_interval: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            store,
            shutdown,
            refresh_interval,
            clock,
            last: None,
        }
    }

    /// Executes the refresh event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut refresh_point = self.clock.instant();
        loop {
            refresh_point += self.refresh_interval;

            let snapshot = ledger::refresh(&self.store, self.clock.now(), self.last.as_ref()).await;
            debug!("Refreshed snapshot for {}", snapshot.today);
            self.last = Some(snapshot.clone());
            self.next
                .send(snapshot)
                .await
                .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
            info!("Published refreshed snapshot");

            tokio::select! {
                // Cancelation stops the loop, drops the sender and thereby
                // winds down the render module as well.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.clock.sleep_until(refresh_point) => ()
            }
        }
    }
}
