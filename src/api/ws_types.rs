use serde::{Deserialize, Serialize};

use crate::aggregator::ViewSlot;
use crate::models::{TokenTotalsView, UserStats};

/// Messages pushed to a connected board client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "stats_update")]
    StatsUpdate(ViewSlot<String, UserStats>),

    #[serde(rename = "rewards_update")]
    RewardsUpdate(ViewSlot<String, TokenTotalsView>),

    #[serde(rename = "error")]
    Error(String),
}

/// Commands a board client sends to change what it is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    SelectUser { user_id: String },
    SelectWallet { address: Option<String> },
}
