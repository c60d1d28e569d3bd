use super::util::is_unique_violation;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{PgExecutor, PgPool};

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepo { pool }
    }
}

async fn fetch_user<'e, E>(executor: E, user_id: UserId) -> Result<Option<User>, UserError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT id, name, age FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| UserError::Store(format!("select user {user_id}: {e}")))
}

async fn friendship_exists<'e, E>(executor: E, a: UserId, b: UserId) -> Result<bool, UserError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
SELECT EXISTS (
    SELECT 1
    FROM friends
    WHERE (user1_id = $1 AND user2_id = $2)
       OR (user1_id = $2 AND user2_id = $1)
)
"#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(executor)
    .await
    .map_err(|e| UserError::Store(format!("select friendship ({a}, {b}): {e}")))
}

#[async_trait::async_trait]
impl UserRepo for PgUserRepo {
    async fn insert_user(&self, name: &str, age: i32) -> Result<UserId, UserError> {
        sqlx::query_scalar::<_, UserId>("INSERT INTO users (name, age) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(age)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                UserError::Store(format!("insert user (name {name}, age {age}): {e}"))
            })
    }

    async fn insert_friendship(&self, a: UserId, b: UserId) -> Result<(), UserError> {
        if a == b {
            return Err(UserError::SelfFriendship(a));
        }

        // check-then-insert runs in one tx; the pair index catches concurrent winners
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::Store(format!("begin friendship tx: {e}")))?;

        for user_id in [a, b] {
            if fetch_user(&mut *tx, user_id).await?.is_none() {
                return Err(UserError::UserNotFound(user_id));
            }
        }

        if friendship_exists(&mut *tx, a, b).await? {
            return Err(UserError::AlreadyFriends(a, b));
        }

        let pair = UserPair::new(a, b);
        let res = sqlx::query("INSERT INTO friends (user1_id, user2_id) VALUES ($1, $2)")
            .bind(pair.low())
            .bind(pair.high())
            .execute(&mut *tx)
            .await;

        match res {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(UserError::AlreadyFriends(a, b)),
            Err(e) => {
                return Err(UserError::Store(format!(
                    "insert friendship ({a}, {b}): {e}"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| UserError::Store(format!("commit friendship ({a}, {b}): {e}")))?;

        Ok(())
    }

    async fn select_user(&self, user_id: UserId) -> Result<User, UserError> {
        fetch_user(&self.pool, user_id)
            .await?
            .ok_or(UserError::UserNotFound(user_id))
    }

    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, UserError> {
        friendship_exists(&self.pool, a, b).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Store(format!("delete user {user_id}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound(user_id));
        }

        Ok(())
    }

    async fn delete_friendships_of(&self, user_id: UserId) -> Result<u64, UserError> {
        let result = sqlx::query("DELETE FROM friends WHERE user1_id = $1 OR user2_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Store(format!("delete friendships of {user_id}: {e}")))?;

        Ok(result.rows_affected())
    }

    async fn update_user_age(&self, user_id: UserId, age: i32) -> Result<(), UserError> {
        let result = sqlx::query("UPDATE users SET age = $1 WHERE id = $2")
            .bind(age)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Store(format!("update age of user {user_id}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound(user_id));
        }

        Ok(())
    }

    async fn list_friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserError> {
        sqlx::query_as::<_, User>(
            r#"
SELECT u.id, u.name, u.age
FROM users u
WHERE u.id <> $1
  AND u.id IN (
      SELECT f.user2_id FROM friends f WHERE f.user1_id = $1
      UNION
      SELECT f.user1_id FROM friends f WHERE f.user2_id = $1
  )
ORDER BY u.id ASC
"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::Store(format!("list friends of {user_id}: {e}")))
    }
}

// Needs a reachable PostgreSQL: DATABASE_URL=postgres://... cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_postgres::ensure_schema;

    async fn repo() -> PgUserRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        PgUserRepo::new(pool)
    }

    #[tokio::test]
    #[ignore]
    async fn friendship_is_symmetric_and_unique() {
        let repo = repo().await;
        let a = repo.insert_user("pg-alice", 30).await.unwrap();
        let b = repo.insert_user("pg-bob", 25).await.unwrap();

        repo.insert_friendship(b, a).await.unwrap();
        assert!(repo.are_friends(a, b).await.unwrap());
        assert_eq!(
            repo.insert_friendship(a, b).await,
            Err(UserError::AlreadyFriends(a, b))
        );

        let friends = repo.list_friends_of(a).await.unwrap();
        assert_eq!(friends.iter().map(|u| u.id).collect::<Vec<_>>(), vec![b]);

        repo.delete_user(a).await.unwrap();
        assert_eq!(repo.delete_friendships_of(a).await.unwrap(), 1);
        assert!(repo.list_friends_of(b).await.unwrap().is_empty());
        repo.delete_user(b).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn missing_rows_map_to_not_found() {
        let repo = repo().await;
        let ghost = UserId(i32::MAX);
        assert_eq!(
            repo.select_user(ghost).await,
            Err(UserError::UserNotFound(ghost))
        );
        assert_eq!(
            repo.update_user_age(ghost, 10).await,
            Err(UserError::UserNotFound(ghost))
        );
    }

    #[tokio::test]
    #[ignore]
    async fn concurrent_reversed_inserts_store_one_canonical_row() {
        let repo = repo().await;
        let a = repo.insert_user("pg-carol", 41).await.unwrap();
        let b = repo.insert_user("pg-dan", 52).await.unwrap();

        let (ab, ba) = tokio::join!(repo.insert_friendship(b, a), repo.insert_friendship(a, b));
        let results = [ab, ba];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(UserError::AlreadyFriends(..))))
                .count(),
            1
        );

        let rows: Vec<(UserId, UserId)> = sqlx::query_as(
            "SELECT user1_id, user2_id FROM friends WHERE user1_id IN ($1, $2) OR user2_id IN ($1, $2)",
        )
        .bind(a)
        .bind(b)
        .fetch_all(&repo.pool)
        .await
        .unwrap();
        let pair = UserPair::new(a, b);
        assert_eq!(rows, vec![(pair.low(), pair.high())]);

        repo.delete_user(a).await.unwrap();
        repo.delete_user(b).await.unwrap();
        repo.delete_friendships_of(a).await.unwrap();
    }
}
