use sha2::{Digest, Sha256};
use sqlx::PgPool;

/// Hex SHA-256 of a bearer token. Only the hash is stored.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Resolve a bearer token to the user id of an unexpired session.
pub async fn resolve_user_id(pool: &PgPool, token: &str) -> anyhow::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT user_id FROM auth_sessions
        WHERE token_hash = $1
          AND (expires_at IS NULL OR expires_at > NOW())
        "#,
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(user_id,)| user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_token("abc"), h);
    }
}
