use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use honorboard::aggregator::FetchSettings;
use honorboard::chain::BalanceSource;
use honorboard::models::{MultiChainBalance, TransactionAmount, TransactionInserted};
use honorboard::store::{PrincipalResolver, SocialStore, TransactionStore};
use honorboard::AppState;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct TxRow {
    pub user_id: String,
    pub to_address: String,
    pub status: String,
    pub token_symbol: String,
    pub amount: String,
}

#[derive(Debug, Default)]
struct Data {
    posts: Vec<(String, String)>,
    comments: Vec<String>,
    reactions: Vec<(String, String)>,
    shares: Vec<String>,
    friendships: Vec<(String, String, String)>,
    transactions: Vec<TxRow>,
    sessions: HashMap<String, String>,
}

/// In-memory stand-in for the Postgres store, with call counting and
/// failure/latency injection per query name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
    calls: AtomicUsize,
    failing: Mutex<HashSet<&'static str>>,
    hanging: Mutex<HashSet<&'static str>>,
    slow_users: Mutex<HashMap<String, Duration>>,
    sessions_down: Mutex<bool>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_post(&self, post_id: &str, owner: &str) {
        self.data.lock().unwrap().posts.push((post_id.into(), owner.into()));
    }

    pub fn add_comments(&self, owner: &str, n: usize) {
        let mut data = self.data.lock().unwrap();
        data.comments.extend(std::iter::repeat(owner.to_string()).take(n));
    }

    pub fn add_reactions(&self, post_id: &str, n: usize) {
        let mut data = self.data.lock().unwrap();
        for i in 0..n {
            data.reactions.push((format!("reactor_{post_id}_{i}"), post_id.into()));
        }
    }

    pub fn add_reaction_by(&self, user_id: &str, post_id: &str) {
        self.data
            .lock()
            .unwrap()
            .reactions
            .push((user_id.into(), post_id.into()));
    }

    pub fn add_shares(&self, owner: &str, n: usize) {
        let mut data = self.data.lock().unwrap();
        data.shares.extend(std::iter::repeat(owner.to_string()).take(n));
    }

    pub fn add_friendship(&self, user_id: &str, friend_id: &str, status: &str) {
        self.data
            .lock()
            .unwrap()
            .friendships
            .push((user_id.into(), friend_id.into(), status.into()));
    }

    pub fn add_transaction(&self, user_id: &str, to_address: &str, status: &str, symbol: &str, amount: &str) {
        self.data.lock().unwrap().transactions.push(TxRow {
            user_id: user_id.into(),
            to_address: to_address.into(),
            status: status.into(),
            token_symbol: symbol.into(),
            amount: amount.into(),
        });
    }

    pub fn add_session(&self, token: &str, user_id: &str) {
        self.data
            .lock()
            .unwrap()
            .sessions
            .insert(token.into(), user_id.into());
    }

    pub fn fail(&self, query: &'static str) {
        self.failing.lock().unwrap().insert(query);
    }

    pub fn hang(&self, query: &'static str) {
        self.hanging.lock().unwrap().insert(query);
    }

    pub fn slow_user(&self, user_id: &str, delay: Duration) {
        self.slow_users.lock().unwrap().insert(user_id.into(), delay);
    }

    pub fn sessions_down(&self) {
        *self.sessions_down.lock().unwrap() = true;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn hit(&self, query: &'static str) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(query) {
            anyhow::bail!("{query} unavailable");
        }
        let hang = self.hanging.lock().unwrap().contains(query);
        if hang {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        Ok(())
    }

    fn count<F: Fn(&Data) -> usize>(&self, f: F) -> u64 {
        f(&self.data.lock().unwrap()) as u64
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn list_post_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        self.hit("posts").await?;
        let delay = self.slow_users.lock().unwrap().get(user_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let data = self.data.lock().unwrap();
        Ok(data
            .posts
            .iter()
            .filter(|(_, owner)| owner == user_id)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn count_comments(&self, user_id: &str) -> anyhow::Result<u64> {
        self.hit("comments").await?;
        Ok(self.count(|d| d.comments.iter().filter(|o| *o == user_id).count()))
    }

    async fn count_reactions_by_user(&self, user_id: &str) -> anyhow::Result<u64> {
        self.hit("reactions").await?;
        Ok(self.count(|d| d.reactions.iter().filter(|(u, _)| u == user_id).count()))
    }

    async fn count_shares(&self, user_id: &str) -> anyhow::Result<u64> {
        self.hit("shared_posts").await?;
        Ok(self.count(|d| d.shares.iter().filter(|o| *o == user_id).count()))
    }

    async fn count_accepted_friendships(&self, user_id: &str) -> anyhow::Result<u64> {
        self.hit("friendships").await?;
        Ok(self.count(|d| {
            d.friendships
                .iter()
                .filter(|(a, b, status)| (a == user_id || b == user_id) && status == "accepted")
                .count()
        }))
    }

    async fn count_reactions_on_post(&self, post_id: &str) -> anyhow::Result<u64> {
        self.hit("post_reactions").await?;
        Ok(self.count(|d| d.reactions.iter().filter(|(_, p)| p == post_id).count()))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.hit("ping").await
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn successful_incoming(
        &self,
        address: &str,
        principal: &str,
    ) -> anyhow::Result<Vec<TransactionAmount>> {
        self.hit("transactions").await?;
        let data = self.data.lock().unwrap();
        Ok(data
            .transactions
            .iter()
            .filter(|t| t.to_address == address && t.status == "success" && t.user_id == principal)
            .map(|t| TransactionAmount::new(t.amount.clone(), t.token_symbol.clone()))
            .collect())
    }
}

#[async_trait]
impl PrincipalResolver for MemoryStore {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<String>> {
        if *self.sessions_down.lock().unwrap() {
            anyhow::bail!("session store unavailable");
        }
        Ok(self.data.lock().unwrap().sessions.get(token).cloned())
    }
}

/// Fixed on-chain balances; records the addresses it was asked about.
#[derive(Debug, Default)]
pub struct FakeBalances {
    pub requests: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl BalanceSource for FakeBalances {
    async fn balances(&self, evm_address: &str, btc_address: &str) -> MultiChainBalance {
        self.requests
            .lock()
            .unwrap()
            .push((evm_address.into(), btc_address.into()));
        MultiChainBalance {
            bnb: "1.5".into(),
            usdt: "20".into(),
            camly: "1000".into(),
            btc: "0".into(),
            btc_network: "0.00010000".into(),
        }
    }
}

#[allow(dead_code)]
pub fn test_settings() -> FetchSettings {
    FetchSettings {
        query_timeout: Duration::from_millis(500),
        post_reaction_concurrency: 4,
        refresh_debounce: Duration::from_millis(20),
    }
}

#[allow(dead_code)]
pub fn test_state(store: Arc<MemoryStore>, balances: Arc<FakeBalances>) -> AppState {
    let (tx_events, _) = broadcast::channel::<TransactionInserted>(16);
    AppState {
        social: store.clone(),
        transactions: store.clone(),
        principals: store,
        balances,
        settings: test_settings(),
        tx_events,
        metrics_handle: honorboard::metrics::init_metrics(),
    }
}

/// The worked example: 3 posts (one with 4 reactions), 10 comments,
/// 2 accepted friendships, 1 share.
#[allow(dead_code)]
pub fn seed_honor_board_user(store: &MemoryStore, user_id: &str) {
    store.add_post("p1", user_id);
    store.add_post("p2", user_id);
    store.add_post("p3", user_id);
    store.add_reactions("p1", 4);
    store.add_comments(user_id, 10);
    store.add_friendship(user_id, "friend_a", "accepted");
    store.add_friendship("friend_b", user_id, "accepted");
    store.add_shares(user_id, 1);
}
