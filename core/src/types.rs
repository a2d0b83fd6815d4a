use serde::{Deserialize, Serialize};

/// Body of `/api/register` and `/api/login`.
///
/// Absent fields decode as empty strings, so `{}` is a well-formed payload
/// that fails credential validation rather than parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl AuthRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Response for register, login and logout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub message: String,
}

impl AuthResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            token: None,
            message: message.into(),
        }
    }

    pub fn with_token(token: String, message: impl Into<String>) -> Self {
        Self {
            token: Some(token),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
}

/// Response for `/api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
    pub me: String,
}

/// Snapshot returned by the store's user listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    /// Every registered username, sorted ascending
    pub users: Vec<String>,
    /// Owner of the token used for the listing
    pub me: String,
}

impl From<UserListing> for UsersResponse {
    fn from(listing: UserListing) -> Self {
        Self {
            users: listing
                .users
                .into_iter()
                .map(|username| UserSummary { username })
                .collect(),
            me: listing.me,
        }
    }
}
