use sqlx::PgPool;

use crate::models::TransactionAmount;

/// Successful transactions received at `address`, owned by `user_id`.
pub async fn get_successful_incoming(
    pool: &PgPool,
    address: &str,
    user_id: &str,
) -> anyhow::Result<Vec<TransactionAmount>> {
    let rows = sqlx::query_as::<_, TransactionAmount>(
        r#"
        SELECT amount::text AS amount, token_symbol
        FROM transactions
        WHERE to_address = $1
          AND status = 'success'
          AND user_id = $2
        "#,
    )
    .bind(address)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
