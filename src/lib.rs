pub mod aggregator;
pub mod api;
pub mod chain;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::aggregator::FetchSettings;
use crate::chain::BalanceSource;
use crate::models::TransactionInserted;
use crate::store::{PrincipalResolver, SocialStore, TransactionStore};

#[derive(Clone)]
pub struct AppState {
    pub social: Arc<dyn SocialStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub principals: Arc<dyn PrincipalResolver>,
    pub balances: Arc<dyn BalanceSource>,
    pub settings: FetchSettings,
    /// Insert notifications for the transactions table.
    pub tx_events: broadcast::Sender<TransactionInserted>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
