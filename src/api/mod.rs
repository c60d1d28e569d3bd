use crate::server::Server;
use crate::settings::ErrorStatusPolicy;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub mod v1;

/// Full HTTP surface: `/api/v1/...` plus error recovery and request tracing.
pub fn filters(
    server: Arc<Server>,
    policy: ErrorStatusPolicy,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    warp::path("api")
        .and(warp::path("v1"))
        .and(v1::routes(server))
        .recover(move |err: warp::Rejection| v1::recover_error(err, policy))
        .with(warp::trace::request())
}
