use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::watch;

use crate::aggregator::{fetch_user_stats, FetchError, Fetched, Latest};
use crate::api::auth::Principal;
use crate::api::ws_types::{ClientCommand, WsMessage};
use crate::models::UserStats;
use crate::services::{watch_rewards, RewardsSlot, RewardsSubscription};
use crate::AppState;

pub async fn handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    principal: Principal,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, principal))
}

/// Per-connection board: the selected user's stats and the selected wallet's
/// live reward totals.
struct Board {
    state: AppState,
    principal: Principal,
    stats: Latest<String, UserStats>,
    rewards: Option<RewardsSubscription>,
}

impl Board {
    fn select_user(&self, user_id: String) {
        let social = self.state.social.clone();
        let settings = self.state.settings;
        let subject = user_id.clone();
        self.stats.select(subject, async move {
            fetch_user_stats(social.as_ref(), &user_id, &settings).await
        });
    }

    /// Replace the wallet subscription; the old one is released on drop.
    fn select_wallet(&mut self, address: Option<String>) -> watch::Receiver<RewardsSlot> {
        if let Principal::Unresolved(reason) = &self.principal {
            self.rewards = None;
            let failed = RewardsSlot::ready(
                address,
                Fetched::failed(FetchError::Principal(reason.clone())),
            );
            let (_tx, rx) = watch::channel(failed);
            return rx;
        }

        let subscription = watch_rewards(
            self.state.transactions.clone(),
            self.state.tx_events.subscribe(),
            address.filter(|a| !a.trim().is_empty()),
            self.principal.user_id().map(str::to_string),
            self.state.settings,
        );
        let rx = subscription.receiver();
        self.rewards = Some(subscription);
        rx
    }
}

async fn handle_socket(mut socket: WebSocket, state: AppState, principal: Principal) {
    tracing::info!("Board WebSocket client connected");

    let mut board = Board {
        state,
        principal,
        stats: Latest::new(),
        rewards: None,
    };
    let mut stats_rx = board.stats.subscribe();
    let mut rewards_rx: Option<watch::Receiver<RewardsSlot>> = None;

    loop {
        let outgoing = tokio::select! {
            changed = stats_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                WsMessage::StatsUpdate(stats_rx.borrow_and_update().clone())
            }
            slot = next_rewards(&mut rewards_rx) => WsMessage::RewardsUpdate(slot),
            client_msg = socket.recv() => {
                match client_msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(ClientCommand::SelectUser { user_id }) => {
                                board.select_user(user_id);
                                continue;
                            }
                            Ok(ClientCommand::SelectWallet { address }) => {
                                let mut rx = board.select_wallet(address);
                                let initial = rx.borrow_and_update().clone();
                                rewards_rx = Some(rx);
                                WsMessage::RewardsUpdate(initial)
                            }
                            Err(e) => WsMessage::Error(format!("invalid command: {e}")),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                        continue;
                    }
                    Some(Ok(_)) => continue, // ignore binary from client
                    Some(Err(_)) => break,
                }
            }
        };

        match serde_json::to_string(&outgoing) {
            Ok(json) => {
                if socket.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize WsMessage");
            }
        }
    }

    // Releases the wallet subscription and any in-flight stats fetch.
    drop(board);
    tracing::info!("Board WebSocket client disconnected");
}

/// Next rewards change, or never if no wallet is selected or its watcher
/// has finished.
async fn next_rewards(rx: &mut Option<watch::Receiver<RewardsSlot>>) -> RewardsSlot {
    match rx {
        Some(rx) => match rx.changed().await {
            Ok(()) => rx.borrow_and_update().clone(),
            Err(_) => std::future::pending().await,
        },
        None => std::future::pending().await,
    }
}
