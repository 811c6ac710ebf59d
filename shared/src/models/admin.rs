//! Admin account models

use serde::{Deserialize, Serialize};

/// Public view of an admin account, as returned by login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminProfile {
    pub id: i64,
    #[serde(rename = "nama")]
    pub display_name: String,
    pub username: String,
}

/// Login credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginInput {
    /// Returns the trimmed username and raw password, or `None` if either is blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().map(str::trim).unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            None
        } else {
            Some((username, password))
        }
    }
}
