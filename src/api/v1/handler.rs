use super::error::*;
use super::request::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct FriendErrorView {
    friend_id: UserId,
    code: ApiErrorCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateUserResponse {
    id: UserId,
    linked: Vec<UserId>,
    friend_errors: Vec<FriendErrorView>,
}

impl From<UserCreated> for CreateUserResponse {
    fn from(created: UserCreated) -> Self {
        let friend_errors = created
            .failed
            .into_iter()
            .map(|failure| FriendErrorView {
                friend_id: failure.friend_id,
                code: ApiErrorCode::from(failure.error.kind()),
                message: failure.error.to_string(),
            })
            .collect();

        CreateUserResponse {
            id: created.id,
            linked: created.linked,
            friend_errors,
        }
    }
}

pub async fn create_user(
    body: CreateUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside create_user");

    let new_user = body
        .into_new_user()
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    let created = user_service
        .create_user(new_user)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    let response = ApiResponse::ok(CreateUserResponse::from(created));
    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::CREATED,
    ))
}

pub async fn befriend(
    body: BefriendRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside befriend");

    let request = body
        .to_friend_request()
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    user_service
        .befriend(request)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    let message = format!(
        "{} and {} are now friends",
        request.source_id, request.target_id
    );
    Ok(warp::reply::json(&ApiResponse::ok(message)))
}

pub async fn delete_user(
    body: DeleteUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside delete_user");

    let user_id = body
        .target_id
        .parse_id("target_id")
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    let name = user_service
        .delete_user(user_id)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(name)))
}

#[derive(Debug, Serialize)]
struct FriendsResponse {
    friends: Vec<User>,
}

pub async fn list_friends(
    user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside list_friends");

    let friends = user_service
        .list_friends(user_id)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(FriendsResponse {
        friends,
    })))
}

pub async fn update_age(
    user_id: UserId,
    body: UpdateAgeRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside update_age");

    let age = body
        .new_age
        .parse("new_age")
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;
    let update = AgeUpdate { user_id, age };

    user_service
        .update_age(update)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok("user age updated")))
}

pub async fn get_user(
    user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    debug!("inside get_user");

    let user = user_service
        .get_user(user_id)
        .await
        .map_err(ApiRejection::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user)))
}
