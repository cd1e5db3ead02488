use anyhow::Result;
use tokio::sync::mpsc::Receiver;
use tracing::debug;

use crate::{cli::status::render_status, ledger::snapshot::Snapshot};

/// Consumes refreshed snapshots and prints the status block for each one.
/// Ends when the refresh side drops its sender.
pub struct RenderModule {
    receiver: Receiver<Snapshot>,
}

impl RenderModule {
    pub fn new(receiver: Receiver<Snapshot>) -> Self {
        Self { receiver }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(snapshot) = self.receiver.recv().await {
            debug!("Rendering snapshot for {}", snapshot.today);
            println!("{}", render_status(&snapshot));
        }

        self.receiver.close();
        Ok(())
    }
}
