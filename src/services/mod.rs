pub mod access;
pub mod artist_service;
pub mod auth_service;
pub mod event_service;
pub mod favorite_service;
pub mod feature_service;
pub mod media_service;
pub mod notification_service;
pub mod organiser_service;
pub mod venue_service;

pub use artist_service::*;
pub use auth_service::*;
pub use event_service::*;
pub use favorite_service::*;
pub use feature_service::*;
pub use media_service::*;
pub use notification_service::*;
pub use organiser_service::*;
pub use venue_service::*;
