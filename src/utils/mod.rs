pub mod jwt;
pub mod media_path;
pub mod pagination;
pub mod password;
pub mod validation;

pub use jwt::*;
pub use media_path::*;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationParams};
pub use password::*;
pub use validation::*;
