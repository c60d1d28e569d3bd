use crate::domain_model::*;

/// Coarse classification of [`UserError`], used by the transport to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("unable to befriend user {0} with themselves")]
    SelfFriendship(UserId),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("users {0} and {1} are already friends")]
    AlreadyFriends(UserId, UserId),
    #[error("store error: {0}")]
    Store(String),
    #[error("user {user_id} ({name}) deleted, but friendship cleanup failed: {reason}")]
    CascadeIncomplete {
        user_id: UserId,
        name: String,
        reason: String,
    },
}

impl UserError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        UserError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::Validation { .. } | UserError::SelfFriendship(_) => ErrorKind::Validation,
            UserError::UserNotFound(_) => ErrorKind::NotFound,
            UserError::AlreadyFriends(..) => ErrorKind::Conflict,
            UserError::Store(_) | UserError::CascadeIncomplete { .. } => ErrorKind::Persistence,
        }
    }
}

/// A friend id from a signup request that could not be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendLinkFailure {
    pub friend_id: UserId,
    pub error: UserError,
}

/// Outcome of [`UserService::create_user`]. The user exists whenever this is
/// returned; `failed` lists the friend links that were skipped.
#[derive(Debug, Clone)]
pub struct UserCreated {
    pub id: UserId,
    pub linked: Vec<UserId>,
    pub failed: Vec<FriendLinkFailure>,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<UserCreated, UserError>;
    async fn befriend(&self, request: FriendRequest) -> Result<(), UserError>;
    /// Returns the name of the deleted user.
    async fn delete_user(&self, user_id: UserId) -> Result<String, UserError>;
    async fn update_age(&self, update: AgeUpdate) -> Result<(), UserError>;
    async fn list_friends(&self, user_id: UserId) -> Result<Vec<User>, UserError>;
    async fn get_user(&self, user_id: UserId) -> Result<User, UserError>;
}
