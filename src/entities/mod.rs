pub mod artists;
pub mod event_artists;
pub mod events;
pub mod favorites;
pub mod notifications;
pub mod organisers;
pub mod owner_types;
pub mod paid_features;
pub mod purchased_features;
pub mod users;
pub mod venues;

pub use artists as artist_entity;
pub use event_artists as event_artist_entity;
pub use events as event_entity;
pub use favorites as favorite_entity;
pub use notifications as notification_entity;
pub use organisers as organiser_entity;
pub use paid_features as paid_feature_entity;
pub use purchased_features as purchased_feature_entity;
pub use users as user_entity;
pub use venues as venue_entity;

pub use events::EventStatus;
pub use favorites::FavoriteType;
pub use owner_types::{AccountOwnerType, FeatureOwnerType};
pub use purchased_features::PurchasedFeatureStatus;
pub use users::UserRole;
