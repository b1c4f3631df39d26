use serde::{Deserialize, Serialize};
use crate::core::library::Role;

// PrincipalEntity abstracts an account that can sign in, keyed by username.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PrincipalEntity {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
}

impl PrincipalEntity {
    pub fn new(username: &str, password: &str, email: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn validate_password(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn is_role(&self, match_role: Role) -> bool {
        self.role == match_role
    }
}
