use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer credential issued at login. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "isEmailVerified")]
    pub email_verified: bool,
}

impl Account {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role.trim_start_matches("ROLE_").eq_ignore_ascii_case("admin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret-jwt");
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
        assert_eq!(token.expose(), "secret-jwt");
    }

    #[test]
    fn admin_role_detection() {
        let mut account = Account {
            email: "a@b.c".into(),
            full_name: "A".into(),
            role: Some("ROLE_ADMIN".into()),
            email_verified: true,
        };
        assert!(account.is_admin());
        account.role = Some("USER".into());
        assert!(!account.is_admin());
    }
}
