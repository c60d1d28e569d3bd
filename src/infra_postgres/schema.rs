use sqlx::PgPool;

// Idempotent; safe to run on every start.
const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
    id   SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    age  INT  NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS friends (
    id       SERIAL PRIMARY KEY,
    user1_id INT NOT NULL,
    user2_id INT NOT NULL
)
"#,
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS friends_unordered_pair_uniq
    ON friends (LEAST(user1_id, user2_id), GREATEST(user1_id, user2_id))
"#,
];

/// Creates the `users` and `friends` tables and the unordered-pair index when
/// missing. Fails if an existing `friends` table already holds duplicate pairs.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("apply schema statement: {e}"))?;
    }

    tracing::info!("database schema ensured");
    Ok(())
}
