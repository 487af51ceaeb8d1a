use serde::{Deserialize, Serialize};

/// A display-ready projection of one fetched user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Given and family names joined by a single space.
    pub display_name: String,
    /// Used as the key of the rendered card. Not guaranteed unique across a list.
    pub email: String,
    /// City and country joined by a comma.
    pub location_label: String,
    pub avatar_url: String,
}

impl UserRecord {
    pub fn new(
        first: &str,
        last: &str,
        email: String,
        city: &str,
        country: &str,
        avatar_url: String,
    ) -> Self {
        Self {
            display_name: format!("{first} {last}"),
            email,
            location_label: format!("{city}, {country}"),
            avatar_url,
        }
    }
}

/// Ordered list of displayed users. Position decides the on-screen slot.
pub type UserList = Vec<UserRecord>;
