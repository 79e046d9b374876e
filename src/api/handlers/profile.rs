use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::wallet::rewards_for;
use super::ApiResponse;
use crate::aggregator::{fetch_user_stats, Fetched};
use crate::api::auth::Principal;
use crate::models::{MultiChainBalance, TokenTotalsView, UserStats};
use crate::AppState;

pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ApiResponse<Fetched<UserStats>>> {
    let stats = fetch_user_stats(state.social.as_ref(), &user_id, &state.settings).await;
    Json(ApiResponse::fetched(stats))
}

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub address: Option<String>,
    /// Bitcoin-network address; defaults to `address`.
    pub btc_address: Option<String>,
}

/// Everything the honor board renders, fetched in parallel.
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub user_id: String,
    pub stats: Fetched<UserStats>,
    pub rewards: Fetched<TokenTotalsView>,
    pub balances: Option<MultiChainBalance>,
}

pub async fn board(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<BoardQuery>,
    principal: Principal,
) -> Json<ApiResponse<BoardView>> {
    let address = query.address.as_deref().filter(|a| !a.trim().is_empty());

    let balances = async {
        match address {
            Some(evm) => {
                let btc = query.btc_address.as_deref().unwrap_or(evm);
                Some(state.balances.balances(evm, btc).await)
            }
            None => None,
        }
    };

    let (stats, rewards, balances) = tokio::join!(
        fetch_user_stats(state.social.as_ref(), &user_id, &state.settings),
        rewards_for(&state, address, &principal),
        balances,
    );

    Json(ApiResponse::ok(BoardView {
        user_id,
        stats,
        rewards,
        balances,
    }))
}
