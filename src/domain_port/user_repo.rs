use crate::application_port::*;
use crate::domain_model::*;

/// Persistence capability set the user service depends on.
///
/// Every method is a single logical unit against the store. Friendships are
/// symmetric: implementations must treat `(a, b)` and `(b, a)` as the same row.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_user(&self, name: &str, age: i32) -> Result<UserId, UserError>;

    /// Fails with `UserNotFound` if either user is missing and with
    /// `AlreadyFriends` if the unordered pair is already stored.
    async fn insert_friendship(&self, a: UserId, b: UserId) -> Result<(), UserError>;

    async fn select_user(&self, user_id: UserId) -> Result<User, UserError>;

    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, UserError>;

    /// Removes the user row only; friendship rows are left to
    /// [`UserRepo::delete_friendships_of`].
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserError>;

    /// Returns the number of friendship rows removed.
    async fn delete_friendships_of(&self, user_id: UserId) -> Result<u64, UserError>;

    async fn update_user_age(&self, user_id: UserId, age: i32) -> Result<(), UserError>;

    /// Distinct friends of `user_id`, ordered by ascending id.
    async fn list_friends_of(&self, user_id: UserId) -> Result<Vec<User>, UserError>;
}
