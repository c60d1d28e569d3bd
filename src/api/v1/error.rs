use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::settings::ErrorStatusPolicy;
use serde::Serialize;
use std::convert::Infallible;
use tracing::warn;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(
    err: Rejection,
    policy: ErrorStatusPolicy,
) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(rejection) = err.find::<ApiRejection>() {
        (rejection.code, rejection.message.clone())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (ApiErrorCode::InvalidRequest, e.to_string())
    } else if err.is_not_found() {
        (ApiErrorCode::RouteNotFound, "no such route".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (ApiErrorCode::MethodNotAllowed, "method not allowed".to_string())
    } else if let Some(e) = err.find::<reject::UnsupportedMediaType>() {
        (ApiErrorCode::InvalidRequest, e.to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (ApiErrorCode::InternalError, format!("Unhandled error: {:?}", err))
    };

    let status = code.status(policy);
    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiErrorCode {
    InvalidRequest,
    NotFound,
    Conflict,
    RouteNotFound,
    MethodNotAllowed,
    InternalError,
}

impl ApiErrorCode {
    pub fn status(self, policy: ErrorStatusPolicy) -> StatusCode {
        match (self, policy) {
            // routing problems never reach the service, keep them honest
            (ApiErrorCode::RouteNotFound, _) => StatusCode::NOT_FOUND,
            (ApiErrorCode::MethodNotAllowed, _) => StatusCode::METHOD_NOT_ALLOWED,
            (_, ErrorStatusPolicy::Flat) => StatusCode::INTERNAL_SERVER_ERROR,
            (ApiErrorCode::InvalidRequest, _) => StatusCode::BAD_REQUEST,
            (ApiErrorCode::NotFound, _) => StatusCode::NOT_FOUND,
            (ApiErrorCode::Conflict, _) => StatusCode::CONFLICT,
            (ApiErrorCode::InternalError, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorKind> for ApiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ApiErrorCode::InvalidRequest,
            ErrorKind::NotFound => ApiErrorCode::NotFound,
            ErrorKind::Conflict => ApiErrorCode::Conflict,
            ErrorKind::Persistence => ApiErrorCode::InternalError,
        }
    }
}

/// Rejection carrying the service error's code and full message.
#[derive(Debug)]
pub struct ApiRejection {
    pub code: ApiErrorCode,
    pub message: String,
}

impl reject::Reject for ApiRejection {}

impl From<UserError> for ApiRejection {
    fn from(error: UserError) -> Self {
        let code = ApiErrorCode::from(error.kind());
        if code == ApiErrorCode::InternalError {
            warn!("Internal error: {}", error);
        }
        ApiRejection {
            code,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_policy_collapses_service_errors_only() {
        let flat = ErrorStatusPolicy::Flat;
        assert_eq!(
            ApiErrorCode::Conflict.status(flat),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorCode::InvalidRequest.status(flat),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiErrorCode::RouteNotFound.status(flat),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn refined_policy_follows_error_kind() {
        let refined = ErrorStatusPolicy::Refined;
        let status = |e: UserError| ApiRejection::from(e).code.status(refined);

        assert_eq!(
            status(UserError::SelfFriendship(crate::domain_model::UserId(1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(UserError::UserNotFound(crate::domain_model::UserId(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(UserError::Store("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
