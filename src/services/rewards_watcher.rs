use std::sync::Arc;

use metrics::counter;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::aggregator::{fetch_wallet_rewards, FetchSettings, ViewSlot};
use crate::models::{TokenTotalsView, TransactionInserted};
use crate::store::TransactionStore;

pub type RewardsSlot = ViewSlot<String, TokenTotalsView>;

/// A live view of one wallet's reward totals.
///
/// The totals are computed once up front and then recomputed from scratch
/// whenever an insert for the address arrives. Dropping the subscription
/// stops the background task.
pub struct RewardsSubscription {
    rx: watch::Receiver<RewardsSlot>,
    task: JoinHandle<()>,
}

impl RewardsSubscription {
    pub fn receiver(&self) -> watch::Receiver<RewardsSlot> {
        self.rx.clone()
    }

    pub fn current(&self) -> RewardsSlot {
        self.rx.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RewardsSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start watching `address` on behalf of `principal`.
pub fn watch_rewards(
    store: Arc<dyn TransactionStore>,
    events: broadcast::Receiver<TransactionInserted>,
    address: Option<String>,
    principal: Option<String>,
    settings: FetchSettings,
) -> RewardsSubscription {
    let (tx, rx) = watch::channel(RewardsSlot::loading(address.clone()));
    let task = tokio::spawn(run_watch(store, events, address, principal, settings, tx));
    RewardsSubscription { rx, task }
}

enum Signal {
    Stale,
    FeedClosed,
}

async fn run_watch(
    store: Arc<dyn TransactionStore>,
    mut events: broadcast::Receiver<TransactionInserted>,
    address: Option<String>,
    principal: Option<String>,
    settings: FetchSettings,
    tx: watch::Sender<RewardsSlot>,
) {
    refresh(store.as_ref(), address.as_deref(), principal.as_deref(), &settings, &tx).await;

    // Without an address there is nothing to be notified about.
    let Some(address) = address else {
        return;
    };
    tracing::debug!(address = %address, "Rewards watcher subscribed");

    loop {
        let signal = tokio::select! {
            _ = tx.closed() => break,
            signal = next_signal(&mut events, &address) => signal,
        };
        if matches!(signal, Signal::FeedClosed) {
            tracing::warn!(address = %address, "Transaction feed closed");
            break;
        }

        // Let a burst of inserts settle, then recompute once.
        tokio::time::sleep(settings.refresh_debounce).await;
        let feed_closed = drain_pending(&mut events);

        counter!("rewards_live_refreshes_total").increment(1);
        refresh(store.as_ref(), Some(&address), principal.as_deref(), &settings, &tx).await;

        if feed_closed {
            break;
        }
    }

    tracing::debug!(address = %address, "Rewards watcher released");
}

async fn refresh(
    store: &dyn TransactionStore,
    address: Option<&str>,
    principal: Option<&str>,
    settings: &FetchSettings,
    tx: &watch::Sender<RewardsSlot>,
) {
    let value = fetch_wallet_rewards(store, address, principal, settings).await;
    tx.send_replace(RewardsSlot::ready(address.map(str::to_string), value));
}

/// Wait for the next insert that concerns `address`.
async fn next_signal(events: &mut broadcast::Receiver<TransactionInserted>, address: &str) -> Signal {
    loop {
        match events.recv().await {
            Ok(event) if event.to_address == address => return Signal::Stale,
            Ok(_) => continue,
            // Missed events may include ours.
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Rewards watcher lagged behind transaction feed");
                return Signal::Stale;
            }
            Err(RecvError::Closed) => return Signal::FeedClosed,
        }
    }
}

/// Discard queued events; the coming recompute covers them. Returns true if
/// the feed has closed.
fn drain_pending(events: &mut broadcast::Receiver<TransactionInserted>) -> bool {
    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => return true,
        }
    }
}
