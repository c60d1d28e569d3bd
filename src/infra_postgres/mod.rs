mod schema;
mod user_repo_postgres;

pub use schema::*;
pub use user_repo_postgres::*;

mod util;
