use sqlx::PgPool;

/// Ids of all posts owned by a user.
pub async fn list_post_ids(pool: &PgPool, user_id: &str) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn count_comments(pool: &PgPool, user_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Reactions this user made.
pub async fn count_reactions_by_user(pool: &PgPool, user_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

pub async fn count_shares(pool: &PgPool, user_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shared_posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Accepted friendships with the user on either side. A row counts once.
pub async fn count_accepted_friendships(pool: &PgPool, user_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM friendships
        WHERE (user_id = $1 OR friend_id = $1)
          AND status = 'accepted'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Reactions received by one post.
pub async fn count_reactions_on_post(pool: &PgPool, post_id: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reactions WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
