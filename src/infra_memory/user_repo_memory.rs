use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    last_user_id: i32,
    users: BTreeMap<UserId, User>,
    last_friend_row: i32,
    // row id -> (user1_id, user2_id) as written
    friends: BTreeMap<i32, (UserId, UserId)>,
}

impl Tables {
    fn has_friendship(&self, a: UserId, b: UserId) -> bool {
        let pair = UserPair::new(a, b);
        self.friends
            .values()
            .any(|&(x, y)| UserPair::new(x, y) == pair)
    }
}

/// Process-local store mirroring the relational schema. Used by the `memory`
/// backend and by tests; each call runs under one lock.
#[derive(Default)]
pub struct InMemoryUserRepo {
    tables: Mutex<Tables>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, UserError> {
        self.tables
            .lock()
            .map_err(|_| UserError::Store("memory store poisoned".to_string()))
    }

    /// Number of stored friendship rows, anomalous ones included.
    pub fn friendship_rows(&self) -> usize {
        self.tables.lock().map(|t| t.friends.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn insert_user(&self, name: &str, age: i32) -> Result<UserId, UserError> {
        let mut tables = self.lock()?;
        tables.last_user_id += 1;
        let id = UserId(tables.last_user_id);
        tables.users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                age,
            },
        );
        Ok(id)
    }

    async fn insert_friendship(&self, a: UserId, b: UserId) -> Result<(), UserError> {
        if a == b {
            return Err(UserError::SelfFriendship(a));
        }

        let mut tables = self.lock()?;
        for user_id in [a, b] {
            if !tables.users.contains_key(&user_id) {
                return Err(UserError::UserNotFound(user_id));
            }
        }
        if tables.has_friendship(a, b) {
            return Err(UserError::AlreadyFriends(a, b));
        }

        let pair = UserPair::new(a, b);
        tables.last_friend_row += 1;
        let row = tables.last_friend_row;
        tables.friends.insert(row, (pair.low(), pair.high()));
        Ok(())
    }

    async fn select_user(&self, user_id: UserId) -> Result<User, UserError> {
        self.lock()?
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserError::UserNotFound(user_id))
    }

    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, UserError> {
        Ok(self.lock()?.has_friendship(a, b))
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserError> {
        self.lock()?
            .users
            .remove(&user_id)
            .map(|_| ())
            .ok_or(UserError::UserNotFound(user_id))
    }

    async fn delete_friendships_of(&self, user_id: UserId) -> Result<u64, UserError> {
        let mut tables = self.lock()?;
        let before = tables.friends.len();
        tables
            .friends
            .retain(|_, &mut (x, y)| x != user_id && y != user_id);
        Ok((before - tables.friends.len()) as u64)
    }

    async fn update_user_age(&self, user_id: UserId, age: i32) -> Result<(), UserError> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(UserError::UserNotFound(user_id))?;
        user.age = age;
        Ok(())
    }

    async fn list_friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserError> {
        let tables = self.lock()?;
        let ids: BTreeSet<UserId> = tables
            .friends
            .values()
            .filter_map(|&(x, y)| UserPair::new(x, y).other(user_id))
            .filter(|&other| other != user_id)
            .collect();

        Ok(ids
            .into_iter()
            .filter_map(|id| tables.users.get(&id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryUserRepo, UserId, UserId, UserId) {
        let repo = InMemoryUserRepo::new();
        let a = repo.insert_user("Alice", 30).await.unwrap();
        let b = repo.insert_user("Bob", 25).await.unwrap();
        let c = repo.insert_user("Carol", 41).await.unwrap();
        (repo, a, b, c)
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_from_one() {
        let (_, a, b, c) = seeded().await;
        assert_eq!((a, b, c), (UserId(1), UserId(2), UserId(3)));
    }

    #[tokio::test]
    async fn friendship_is_checked_in_both_orientations() {
        let (repo, a, b, _) = seeded().await;
        repo.insert_friendship(b, a).await.unwrap();

        assert!(repo.are_friends(a, b).await.unwrap());
        assert!(repo.are_friends(b, a).await.unwrap());
        assert_eq!(
            repo.insert_friendship(a, b).await,
            Err(UserError::AlreadyFriends(a, b))
        );
        assert_eq!(repo.friendship_rows(), 1);
    }

    #[tokio::test]
    async fn friendship_requires_both_users() {
        let (repo, a, _, _) = seeded().await;
        let ghost = UserId(99);
        assert_eq!(
            repo.insert_friendship(a, ghost).await,
            Err(UserError::UserNotFound(ghost))
        );
        assert_eq!(
            repo.insert_friendship(ghost, a).await,
            Err(UserError::UserNotFound(ghost))
        );
        assert_eq!(repo.friendship_rows(), 0);
    }

    #[tokio::test]
    async fn friends_are_listed_by_ascending_id() {
        let (repo, a, b, c) = seeded().await;
        repo.insert_friendship(c, b).await.unwrap();
        repo.insert_friendship(a, b).await.unwrap();

        let ids: Vec<UserId> = repo
            .list_friends_of(b)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test]
    async fn deleting_user_leaves_friendship_rows_until_cleanup() {
        let (repo, a, b, c) = seeded().await;
        repo.insert_friendship(a, b).await.unwrap();
        repo.insert_friendship(c, a).await.unwrap();
        repo.insert_friendship(b, c).await.unwrap();

        repo.delete_user(a).await.unwrap();
        assert_eq!(repo.friendship_rows(), 3);
        // dangling rows never surface a deleted user
        assert_eq!(repo.list_friends_of(b).await.unwrap().len(), 1);

        assert_eq!(repo.delete_friendships_of(a).await.unwrap(), 2);
        assert_eq!(repo.friendship_rows(), 1);
        assert_eq!(
            repo.delete_user(a).await,
            Err(UserError::UserNotFound(a))
        );
    }

    #[tokio::test]
    async fn update_age_touches_only_existing_rows() {
        let (repo, a, _, _) = seeded().await;
        repo.update_user_age(a, 31).await.unwrap();
        assert_eq!(repo.select_user(a).await.unwrap().age, 31);

        let ghost = UserId(42);
        assert_eq!(
            repo.update_user_age(ghost, 1).await,
            Err(UserError::UserNotFound(ghost))
        );
    }

    #[tokio::test]
    async fn friendship_rows_are_stored_low_id_first() {
        let (repo, a, _, c) = seeded().await;
        repo.insert_friendship(c, a).await.unwrap();

        let tables = repo.lock().unwrap();
        let rows: Vec<_> = tables.friends.values().copied().collect();
        assert_eq!(rows, vec![(a, c)]);
    }

    #[tokio::test]
    async fn doubled_rows_list_each_friend_once() {
        let (repo, a, b, _) = seeded().await;
        {
            let mut tables = repo.lock().unwrap();
            tables.friends.insert(1, (a, b));
            tables.friends.insert(2, (b, a));
        }

        let friends = repo.list_friends_of(a).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, b);
        assert_eq!(repo.list_friends_of(b).await.unwrap().len(), 1);
    }
}
