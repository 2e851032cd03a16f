//! Ownership model.
//!
//! Rows store their controlling account as an `(owner_type, owner_id)` pair.
//! Inside the service that pair is always lifted into [`Owner`], and the acting
//! account into [`Principal`], so the authorization rule lives in one place.

use crate::entities::{AccountOwnerType, FeatureOwnerType, UserRole, user_entity as users};
use serde::{Deserialize, Serialize};

/// Account that controls a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Owner {
    Artist(i64),
    Organiser(i64),
    User(i64),
}

impl Owner {
    pub fn from_parts(owner_type: AccountOwnerType, owner_id: i64) -> Self {
        match owner_type {
            AccountOwnerType::Artist => Owner::Artist(owner_id),
            AccountOwnerType::Organiser => Owner::Organiser(owner_id),
            AccountOwnerType::User => Owner::User(owner_id),
        }
    }

    pub fn into_parts(self) -> (AccountOwnerType, i64) {
        match self {
            Owner::Artist(id) => (AccountOwnerType::Artist, id),
            Owner::Organiser(id) => (AccountOwnerType::Organiser, id),
            Owner::User(id) => (AccountOwnerType::User, id),
        }
    }
}

/// Entity a purchased feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum FeatureOwner {
    Artist(i64),
    Venue(i64),
    Event(i64),
}

impl FeatureOwner {
    pub fn from_parts(owner_type: FeatureOwnerType, owner_id: i64) -> Self {
        match owner_type {
            FeatureOwnerType::Artist => FeatureOwner::Artist(owner_id),
            FeatureOwnerType::Venue => FeatureOwner::Venue(owner_id),
            FeatureOwnerType::Event => FeatureOwner::Event(owner_id),
        }
    }

    pub fn into_parts(self) -> (FeatureOwnerType, i64) {
        match self {
            FeatureOwner::Artist(id) => (FeatureOwnerType::Artist, id),
            FeatureOwner::Venue(id) => (FeatureOwnerType::Venue, id),
            FeatureOwner::Event(id) => (FeatureOwnerType::Event, id),
        }
    }

    pub fn owner_type(self) -> FeatureOwnerType {
        self.into_parts().0
    }
}

/// The acting account, always loaded from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub role: UserRole,
    pub artist_id: Option<i64>,
    pub organiser_id: Option<i64>,
}

impl From<&users::Model> for Principal {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
            artist_id: user.artist_id,
            organiser_id: user.organiser_id,
        }
    }
}

impl Principal {
    /// Single equality check per owner kind; no inheritance or delegation.
    pub fn is_owner(&self, owner: Owner) -> bool {
        match owner {
            Owner::Artist(id) => self.role == UserRole::Artist && self.artist_id == Some(id),
            Owner::Organiser(id) => {
                self.role == UserRole::Organiser && self.organiser_id == Some(id)
            }
            Owner::User(id) => self.id == id,
        }
    }

    /// Owner stamped on venues and events this principal creates.
    pub fn default_owner(&self) -> Owner {
        match (self.role, self.organiser_id, self.artist_id) {
            (UserRole::Organiser, Some(organiser_id), _) => Owner::Organiser(organiser_id),
            (UserRole::Artist, _, Some(artist_id)) => Owner::Artist(artist_id),
            _ => Owner::User(self.id),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole, artist_id: Option<i64>, organiser_id: Option<i64>) -> Principal {
        Principal {
            id: 7,
            role,
            artist_id,
            organiser_id,
        }
    }

    #[test]
    fn test_artist_owns_own_profile_only() {
        let p = principal(UserRole::Artist, Some(3), None);
        assert!(p.is_owner(Owner::Artist(3)));
        assert!(!p.is_owner(Owner::Artist(4)));
        assert!(!p.is_owner(Owner::Organiser(3)));
    }

    #[test]
    fn test_organiser_match_requires_role() {
        let organiser = principal(UserRole::Organiser, None, Some(5));
        assert!(organiser.is_owner(Owner::Organiser(5)));
        assert!(!organiser.is_owner(Owner::Organiser(6)));

        // a stale organiser_id on a non-organiser account grants nothing
        let demoted = principal(UserRole::User, None, Some(5));
        assert!(!demoted.is_owner(Owner::Organiser(5)));
    }

    #[test]
    fn test_artist_id_does_not_match_other_owner_kinds() {
        let p = principal(UserRole::Artist, Some(7), None);
        assert!(!p.is_owner(Owner::Organiser(7)));
        // user ownership is keyed on the account id, which is also 7 here
        assert!(p.is_owner(Owner::User(7)));
        assert!(!p.is_owner(Owner::User(8)));
    }

    #[test]
    fn test_admin_has_no_implicit_ownership() {
        let admin = principal(UserRole::Admin, None, None);
        assert!(!admin.is_owner(Owner::Artist(1)));
        assert!(!admin.is_owner(Owner::Organiser(1)));
        assert!(admin.is_admin());
    }

    #[test]
    fn test_missing_profile_ids_never_match() {
        let p = principal(UserRole::Artist, None, None);
        assert!(!p.is_owner(Owner::Artist(0)));
    }

    #[test]
    fn test_default_owner_by_role() {
        assert_eq!(
            principal(UserRole::Organiser, None, Some(2)).default_owner(),
            Owner::Organiser(2)
        );
        assert_eq!(
            principal(UserRole::Artist, Some(9), None).default_owner(),
            Owner::Artist(9)
        );
        // no profile yet
        assert_eq!(
            principal(UserRole::Organiser, None, None).default_owner(),
            Owner::User(7)
        );
        assert_eq!(principal(UserRole::User, None, None).default_owner(), Owner::User(7));
    }

    #[test]
    fn test_owner_parts_round_trip() {
        for owner in [Owner::Artist(1), Owner::Organiser(2), Owner::User(3)] {
            let (t, id) = owner.into_parts();
            assert_eq!(Owner::from_parts(t, id), owner);
        }
        for owner in [
            FeatureOwner::Artist(1),
            FeatureOwner::Venue(2),
            FeatureOwner::Event(3),
        ] {
            let (t, id) = owner.into_parts();
            assert_eq!(FeatureOwner::from_parts(t, id), owner);
        }
    }

    #[test]
    fn test_owner_json_shape() {
        let json = serde_json::to_value(Owner::Organiser(4)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "organiser", "id": 4}));
        let parsed: FeatureOwner =
            serde_json::from_value(serde_json::json!({"type": "venue", "id": 11})).unwrap();
        assert_eq!(parsed, FeatureOwner::Venue(11));
    }
}
