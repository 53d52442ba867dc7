//! Signed-in identity and the auth endpoints.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use quiz_core::model::{Account, AuthToken};

use crate::api::{ApiMessage, RestClient};
use crate::error::{ApiError, AuthError};

/// Supplies the bearer credential and identity attached to backend calls.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<AuthToken>;
    fn account(&self) -> Option<Account>;
}

/// In-memory credential holder. Injected wherever a credential is needed.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<(AuthToken, Account)>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, token: AuthToken, account: Account) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some((token, account));
    }

    pub fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CredentialProvider for CredentialStore {
    fn token(&self) -> Option<AuthToken> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(token, _)| token.clone())
    }

    fn account(&self) -> Option<Account> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, account)| account.clone())
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(flatten)]
    account: Account,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Login, registration and password flows.
#[derive(Clone, Debug)]
pub struct AuthService {
    rest: RestClient,
    store: Arc<CredentialStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(rest: RestClient, store: Arc<CredentialStore>) -> Self {
        Self { rest, store }
    }

    #[must_use]
    pub fn credentials(&self) -> Arc<CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Signs in and stores the returned credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the backend message (or a fallback),
    /// `AuthError::MissingToken` if the reply carries no token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let reply: AuthResponse = self
            .rest
            .post("api/auth/login", &LoginBody { email, password })
            .await
            .map_err(|err| rejected(err, "Login failed, please try again."))?;

        let token = reply
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.store.sign_in(AuthToken::new(token), reply.account.clone());
        tracing::info!(email = %reply.account.email, "signed in");
        Ok(reply.account)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the backend refuses the registration.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let body = RegisterBody {
            full_name,
            email,
            password,
        };
        let reply: serde_json::Value = self
            .rest
            .post("api/auth/register", &body)
            .await
            .map_err(|err| rejected(err, "Registration failed, please try again."))?;
        Ok(reply
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Registration successful. Please verify your email.")
            .to_owned())
    }

    pub fn logout(&self) {
        self.store.sign_out();
        tracing::info!("signed out");
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the request fails.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let reply: ApiMessage = self
            .rest
            .post("api/auth/forgot-password", &EmailBody { email })
            .await
            .map_err(|err| rejected(err, "Failed to send reset link"))?;
        message_or(reply, "Password reset link sent to your email")
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the token is invalid or the request fails.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError> {
        let reply: ApiMessage = self
            .rest
            .post(
                "api/auth/reset-password",
                &ResetPasswordBody {
                    token,
                    new_password,
                },
            )
            .await
            .map_err(|err| rejected(err, "Failed to reset password"))?;
        message_or(reply, "Password reset successful")
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the current password is wrong or the request fails.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let reply: ApiMessage = self
            .rest
            .post(
                "api/auth/change-password",
                &ChangePasswordBody {
                    current_password,
                    new_password,
                },
            )
            .await
            .map_err(|err| rejected(err, "Failed to change password"))?;
        message_or(reply, "Password changed successfully")
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the token is invalid or expired.
    pub async fn verify_email(&self, token: &str) -> Result<String, AuthError> {
        let reply: ApiMessage = self
            .rest
            .get_with_query("api/auth/verify-email", &[("token", token)])
            .await
            .map_err(|err| rejected(err, "Verification failed"))?;
        message_or(reply, "Email verified")
    }

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the request fails.
    pub async fn resend_verification(&self, email: &str) -> Result<String, AuthError> {
        let reply: ApiMessage = self
            .rest
            .post_with_query::<(), _>("api/auth/resend-verification", &[("email", email)], None)
            .await
            .map_err(|err| rejected(err, "Failed to resend verification email"))?;
        message_or(reply, "Verification email sent")
    }
}

fn rejected(err: ApiError, fallback: &str) -> AuthError {
    match err.server_message() {
        Some(message) => AuthError::Rejected(message.to_owned()),
        None => {
            tracing::warn!(error = %err, "auth request failed");
            AuthError::Rejected(fallback.to_owned())
        }
    }
}

fn message_or(reply: ApiMessage, fallback: &str) -> Result<String, AuthError> {
    let message = reply.message.unwrap_or_else(|| fallback.to_owned());
    if reply.success == Some(false) {
        return Err(AuthError::Rejected(message));
    }
    Ok(message)
}
