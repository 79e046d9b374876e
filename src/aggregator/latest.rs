use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::fetch::Fetched;

/// What the board shows for one aggregate: which subject it belongs to,
/// whether a fetch is pending, and the latest value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSlot<K, V> {
    pub subject: Option<K>,
    pub loading: bool,
    pub value: Fetched<V>,
    #[serde(skip)]
    generation: u64,
}

impl<K, V: Default> ViewSlot<K, V> {
    pub fn idle() -> Self {
        Self {
            subject: None,
            loading: false,
            value: Fetched::empty(),
            generation: 0,
        }
    }

    pub fn loading(subject: Option<K>) -> Self {
        Self {
            subject,
            loading: true,
            value: Fetched::empty(),
            generation: 0,
        }
    }

    pub fn ready(subject: Option<K>, value: Fetched<V>) -> Self {
        Self {
            subject,
            loading: false,
            value,
            generation: 0,
        }
    }
}

/// Holds the result of the most recently selected subject only.
///
/// Each [`Latest::select`] bumps a generation under the channel lock and
/// aborts the previous fetch task. A result is applied only if its generation
/// is still current, so a slow response for an old subject never replaces
/// the state of a newer one.
pub struct Latest<K, V> {
    state: watch::Sender<ViewSlot<K, V>>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> Latest<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Default + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewSlot::idle());
        Self {
            state,
            inflight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSlot<K, V>> {
        self.state.subscribe()
    }

    /// Switch to `subject` and start `fetch` for it.
    pub fn select<F>(&self, subject: K, fetch: F)
    where
        F: Future<Output = Fetched<V>> + Send + 'static,
    {
        let mut generation = 0;
        self.state.send_modify(|slot| {
            generation = slot.generation + 1;
            *slot = ViewSlot {
                subject: Some(subject),
                loading: true,
                value: Fetched::empty(),
                generation,
            };
        });

        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            let value = fetch.await;
            let applied = state.send_if_modified(|slot| {
                if slot.generation != generation {
                    return false;
                }
                slot.loading = false;
                slot.value = value;
                true
            });
            if !applied {
                tracing::debug!(generation, "Discarding stale fetch result");
            }
        });

        let previous = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl<K, V> Default for Latest<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Latest<K, V> {
    fn drop(&mut self) {
        let inflight = self
            .inflight
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = inflight.take() {
            handle.abort();
        }
    }
}
