//! The long-running `watch` mode: a refresh module periodically fetches and
//! reconciles the ledger, a render module prints each resulting snapshot.
//! The two communicate over an mpsc channel and stop on ctrl-c.

use std::time::Duration;

use anyhow::Result;
use refresh::RefreshModule;
use render::RenderModule;
use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    ledger::snapshot::Snapshot,
    store::ledger_store::LedgerStore,
    utils::clock::{Clock, SystemClock},
};

pub mod refresh;
pub mod render;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the watch loop until ctrl-c.
pub async fn start_watch<S: LedgerStore + 'static>(
    store: S,
    refresh_interval: Duration,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel::<Snapshot>(4);
    let shutdown_token = CancellationToken::new();

    let refresher = create_refresher(sender, store, &shutdown_token, refresh_interval, SystemClock);
    let renderer = RenderModule::new(receiver);

    let (_, refresh_result, render_result) = tokio::join!(
        detect_shutdown(shutdown_token),
        refresher.run(),
        renderer.run(),
    );

    if let Err(refresh_result) = refresh_result {
        error!("Refresh module got an error {:?}", refresh_result);
    }

    if let Err(render_result) = render_result {
        error!("Render module got an error {:?}", render_result);
    }

    Ok(())
}

fn create_refresher<S: LedgerStore>(
    sender: mpsc::Sender<Snapshot>,
    store: S,
    shutdown_token: &CancellationToken,
    refresh_interval: Duration,
    clock: impl Clock,
) -> RefreshModule<S> {
    RefreshModule::new(
        sender,
        store,
        shutdown_token.clone(),
        refresh_interval,
        Box::new(clock),
    )
}

async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
