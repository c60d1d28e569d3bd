use super::error::ApiRejection;
use super::handler;
use super::request::parse_path_id;
use crate::application_port::UserService;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let create_user = warp::path("users")
        .and(warp::path("new"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::create_user);

    let befriend = warp::path("users")
        .and(warp::path("befriend"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::befriend);

    let delete_user = warp::path("users")
        .and(warp::path("delete"))
        .and(warp::path::end())
        .and(warp::delete())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::delete_user);

    let list_friends = warp::path("users")
        .and(user_id())
        .and(warp::path("friends"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with(server.user_service.clone()))
        .and_then(handler::list_friends);

    let update_age = warp::path("users")
        .and(user_id())
        .and(warp::path::end())
        .and(warp::put())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::update_age);

    let get_user = warp::path("users")
        .and(user_id())
        .and(warp::path::end())
        .and(warp::get())
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user);

    create_user
        .or(befriend)
        .or(delete_user)
        .or(list_friends)
        .or(update_age)
        .or(get_user)
}

/// Path segment made of digits only; anything else is not a route.
fn user_id() -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::path::param::<String>().and_then(|raw: String| async move {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(reject::not_found());
        }
        parse_path_id(&raw)
            .map_err(ApiRejection::from)
            .map_err(reject::custom)
    })
}

fn with(
    service: Arc<dyn UserService>,
) -> impl Filter<Extract = (Arc<dyn UserService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}
