use async_trait::async_trait;
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::{Result, TokenPair};

/// Account data submitted to `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }
}

/// The caller behind a validated access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

/// Credential storage and token issuance.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and issues its first token pair.
    async fn register(&self, registration: Registration) -> Result<TokenPair>;

    /// Checks credentials and issues a token pair.
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair>;

    /// Resolves an access token to the identity it was issued for.
    async fn validate(&self, access_token: &str) -> Result<Identity>;
}
