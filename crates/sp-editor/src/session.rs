//! Signed-in user facts
//!
//! Credentials are issued elsewhere; the editor only carries the user id,
//! role and bearer token it was started with.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates, deletes and assigns layouts
    #[default]
    Admin,
    /// Reads and updates the layouts assigned to them
    Owner,
}

impl Role {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Option<String>,
    pub name: String,
    pub role: Role,
    pub token: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user_id: None,
            name: "local".to_string(),
            role: Role::Admin,
            token: None,
        }
    }
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_create(&self) -> bool {
        self.is_admin()
    }

    pub fn can_delete(&self) -> bool {
        self.is_admin()
    }

    pub fn can_assign(&self) -> bool {
        self.is_admin()
    }

    /// Admins update anything; owners only their own layouts
    pub fn can_update(&self, owner: Option<&str>) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Owner => match (self.user_id.as_deref(), owner) {
                (Some(user), Some(owner)) => user == owner,
                _ => false,
            },
        }
    }
}
