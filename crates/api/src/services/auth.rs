//! Operator authentication providers.
//!
//! The console does not own identities; it verifies credentials against a
//! provider and only then issues its own session token. Two providers are
//! supported: `bootstrap` checks operators declared in configuration
//! (Argon2id hashes), `http` delegates to a hosted identity service.
//!
//! Every sign-in failure collapses to [`AuthError::InvalidCredentials`] at
//! the route layer regardless of cause, so responses cannot be used to
//! enumerate accounts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shared::password::verify_password;

use crate::config::BootstrapOperator;

/// Identity confirmed by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub email: String,
}

/// Error type for provider operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This email is already in use")]
    EmailInUse,

    #[error("Registration is not available")]
    RegistrationUnsupported,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Credential verification boundary.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verifies credentials and returns the confirmed identity.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Creates a new account, when the provider supports it.
    async fn register(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Provider backed by config-declared operator accounts.
pub struct BootstrapAuthProvider {
    operators: Vec<BootstrapOperator>,
}

impl BootstrapAuthProvider {
    pub fn new(operators: Vec<BootstrapOperator>) -> Self {
        Self { operators }
    }
}

#[async_trait]
impl AuthProvider for BootstrapAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let operator = self
            .operators
            .iter()
            .find(|op| op.email.eq_ignore_ascii_case(email))
            .ok_or(AuthError::InvalidCredentials)?;

        match verify_password(password, &operator.password_hash) {
            Ok(true) => Ok(AuthenticatedUser {
                account_id: operator.account_id.clone(),
                email: operator.email.clone(),
            }),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(err) => {
                debug!(email = %operator.email, error = %err, "operator hash unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<AuthenticatedUser, AuthError> {
        Err(AuthError::RegistrationUnsupported)
    }
}

/// Provider delegating to a hosted identity service.
pub struct HttpAuthProvider {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityResponse {
    account_id: String,
    email: String,
}

impl HttpAuthProvider {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<reqwest::Response, AuthError> {
        self.client
            .post(format!("{}{}", self.endpoint, path))
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self.post_credentials("/v1/sessions", email, password).await?;
        match response.status() {
            status if status.is_success() => {
                let identity: IdentityResponse = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Provider(e.to_string()))?;
                Ok(AuthenticatedUser {
                    account_id: identity.account_id,
                    email: identity.email,
                })
            }
            status if status.is_client_error() => Err(AuthError::InvalidCredentials),
            status => Err(AuthError::Provider(format!("identity service returned {}", status))),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self.post_credentials("/v1/accounts", email, password).await?;
        match response.status() {
            status if status.is_success() => {
                let identity: IdentityResponse = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Provider(e.to_string()))?;
                Ok(AuthenticatedUser {
                    account_id: identity.account_id,
                    email: identity.email,
                })
            }
            reqwest::StatusCode::CONFLICT => Err(AuthError::EmailInUse),
            status if status.is_client_error() => Err(AuthError::InvalidCredentials),
            status => Err(AuthError::Provider(format!("identity service returned {}", status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::password::hash_password;

    fn provider() -> BootstrapAuthProvider {
        BootstrapAuthProvider::new(vec![BootstrapOperator {
            account_id: "acct1".into(),
            email: "op@example.com".into(),
            password_hash: hash_password("secret123").unwrap(),
        }])
    }

    #[tokio::test]
    async fn test_bootstrap_sign_in_success() {
        let user = provider().sign_in("op@example.com", "secret123").await.unwrap();
        assert_eq!(user.account_id, "acct1");
        assert_eq!(user.email, "op@example.com");
    }

    #[tokio::test]
    async fn test_bootstrap_sign_in_is_case_insensitive_on_email() {
        assert!(provider().sign_in("OP@Example.COM", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_bad_credentials() {
        assert!(matches!(
            provider().sign_in("op@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            provider().sign_in("ghost@example.com", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_has_no_registration() {
        assert!(matches!(
            provider().register("new@example.com", "secret123").await,
            Err(AuthError::RegistrationUnsupported)
        ));
    }
}
