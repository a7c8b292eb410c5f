pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod spots;

pub use error::ApiError;
pub use routes::{create_router, create_static_router};
