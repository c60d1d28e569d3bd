mod error;
mod handler;
mod request;
mod router;

pub use error::{ApiErrorCode, recover_error};
pub use router::routes;
