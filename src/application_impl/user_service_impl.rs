use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::UserRepo;
use crate::logger::*;
use std::sync::Arc;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealUserService {
        RealUserService { user_repo }
    }

    async fn link(&self, a: UserId, b: UserId) -> Result<(), UserError> {
        if a == b {
            return Err(UserError::SelfFriendship(a));
        }
        self.user_repo.insert_friendship(a, b).await
    }
}

fn validate_name(name: &str) -> Result<(), UserError> {
    if name.trim().is_empty() {
        return Err(UserError::validation("name", "must not be empty"));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), UserError> {
    if age < 0 {
        return Err(UserError::validation(
            "age",
            format!("must be non-negative, got {age}"),
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn create_user(&self, new_user: NewUser) -> Result<UserCreated, UserError> {
        validate_name(&new_user.name)?;
        validate_age(new_user.age)?;

        let user_id = self
            .user_repo
            .insert_user(&new_user.name, new_user.age)
            .await?;
        info!(%user_id, name = %new_user.name, "user created");

        // friend links are best effort: the user stays created whatever happens here
        let mut created = UserCreated {
            id: user_id,
            linked: Vec::new(),
            failed: Vec::new(),
        };
        for friend_id in new_user.friends {
            match self.link(user_id, friend_id).await {
                Ok(()) => {
                    info!(%user_id, %friend_id, "friendship added");
                    created.linked.push(friend_id);
                }
                Err(error) => {
                    warn!(%user_id, %friend_id, %error, "unable to add friendship for new user");
                    created.failed.push(FriendLinkFailure { friend_id, error });
                }
            }
        }

        Ok(created)
    }

    async fn befriend(&self, request: FriendRequest) -> Result<(), UserError> {
        let FriendRequest {
            source_id,
            target_id,
        } = request;
        self.link(source_id, target_id).await?;
        info!(%source_id, %target_id, "friendship added");
        Ok(())
    }

    /// Not atomic: the user row goes first, then its friendship rows. A failed
    /// cleanup is reported as `CascadeIncomplete` and the user stays deleted.
    async fn delete_user(&self, user_id: UserId) -> Result<String, UserError> {
        let user = self.user_repo.select_user(user_id).await?;

        self.user_repo.delete_user(user_id).await?;
        info!(%user_id, name = %user.name, "user deleted");

        match self.user_repo.delete_friendships_of(user_id).await {
            Ok(removed) => {
                info!(%user_id, removed, "friendships of deleted user removed");
                Ok(user.name)
            }
            Err(e) => {
                error!(%user_id, error = %e, "friendship cleanup failed after user deletion");
                Err(UserError::CascadeIncomplete {
                    user_id,
                    name: user.name,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn update_age(&self, update: AgeUpdate) -> Result<(), UserError> {
        validate_age(update.age)?;
        self.user_repo.select_user(update.user_id).await?;

        self.user_repo
            .update_user_age(update.user_id, update.age)
            .await?;
        info!(user_id = %update.user_id, age = update.age, "user age updated");
        Ok(())
    }

    async fn list_friends(&self, user_id: UserId) -> Result<Vec<User>, UserError> {
        self.user_repo.select_user(user_id).await?;
        self.user_repo.list_friends_of(user_id).await
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, UserError> {
        self.user_repo.select_user(user_id).await
    }
}
