use std::time::Duration;

use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::models::TransactionInserted;

const BASE_RECONNECT_DELAY: Duration = Duration::from_secs(2);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

/// Channel the `transactions` insert trigger notifies on. Must match
/// `notify_transaction_inserted()` in the migrations.
pub const TRANSACTIONS_CHANNEL: &str = "transactions_inserted";

/// Forward `pg_notify` insert events from the transactions trigger onto the
/// in-process broadcast feed.
pub async fn run_transaction_listener(
    pool: PgPool,
    events: broadcast::Sender<TransactionInserted>,
) {
    let channel = TRANSACTIONS_CHANNEL;
    let mut attempt: u32 = 0;

    loop {
        tracing::info!(channel = %channel, "Transaction listener connecting...");

        match PgListener::connect_with(&pool).await {
            Ok(mut listener) => match listener.listen(channel).await {
                Ok(()) => {
                    tracing::info!(channel = %channel, "Listening for transaction inserts");
                    attempt = 0;

                    loop {
                        match listener.recv().await {
                            Ok(notification) => {
                                forward_notification(notification.payload(), &events);
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Transaction listener: recv failed");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Transaction listener: LISTEN failed");
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Transaction listener: connection failed");
            }
        }

        // Exponential backoff
        let delay = BASE_RECONNECT_DELAY * 2u32.saturating_pow(attempt);
        let delay = delay.min(MAX_RECONNECT_DELAY);
        attempt = attempt.saturating_add(1);
        tracing::info!(delay_secs = delay.as_secs(), attempt, "Transaction listener reconnecting...");
        sleep(delay).await;
    }
}

/// Decode a notification payload. Malformed payloads are dropped.
pub fn parse_notification(payload: &str) -> Option<TransactionInserted> {
    match serde_json::from_str::<TransactionInserted>(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, payload, "Ignoring malformed transaction notification");
            None
        }
    }
}

fn forward_notification(payload: &str, events: &broadcast::Sender<TransactionInserted>) {
    let Some(event) = parse_notification(payload) else {
        return;
    };

    tracing::debug!(to_address = %event.to_address, "Transaction inserted");
    // No receivers just means nobody is watching a wallet right now.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_matches_migration_trigger() {
        let migration = include_str!("../../migrations/20250101000000_init.sql");
        let notify = format!("pg_notify(\n        '{TRANSACTIONS_CHANNEL}'");
        assert!(migration.contains(&notify));
        assert_eq!(migration.matches("pg_notify(").count(), 1);
    }

    #[test]
    fn test_parse_trigger_payload() {
        let event = parse_notification(
            r#"{"id":"0b6c8f5e-6f0f-4a4e-9a57-3f1d2c7e9b10","to_address":"0xabc"}"#,
        )
        .unwrap();
        assert_eq!(event.to_address, "0xabc");
        assert!(event.id.is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_notification("not json").is_none());
        assert!(parse_notification(r#"{"id":null}"#).is_none());
    }

    #[tokio::test]
    async fn test_forward_reaches_subscribers() {
        let (tx, mut rx) = broadcast::channel(4);
        forward_notification(r#"{"id":null,"to_address":"0xdef"}"#, &tx);
        assert_eq!(rx.recv().await.unwrap().to_address, "0xdef");
    }
}
