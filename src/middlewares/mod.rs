pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, CurrentUserId, bearer_token, current_user_id};
pub use cors::create_cors;
