pub mod artist;
pub mod common;
pub mod event;
pub mod favorite;
pub mod notification;
pub mod organiser;
pub mod owner;
pub mod purchased_feature;
pub mod user;
pub mod venue;

pub use artist::*;
pub use common::*;
pub use event::*;
pub use favorite::*;
pub use notification::*;
pub use organiser::*;
pub use owner::*;
pub use purchased_feature::*;
pub use user::*;
pub use venue::*;
