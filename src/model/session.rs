use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Different privilege levels a session can carry.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Admin => "admin",
                Self::User => "user",
            }
        )
    }
}

/// The identity the server reports for the current session cookie. The
/// console only ever holds a read-only copy of this; the cookie itself is
/// managed by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    /// What the server reports when no cookie (or an invalid one) is
    /// presented.
    pub fn anonymous() -> Self {
        Self {
            role: None,
            user_id: None,
            is_authenticated: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role == Some(Role::Admin)
    }
}

/// Username/password pair for login and registration.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
