//! JWT access and refresh tokens.

use chrono::{Duration, Utc};
use common::UserId;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Which kind of token a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a decimal string.
    pub sub: String,
    pub username: String,
    pub admin: bool,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

/// Signing secret and token lifetimes.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Creates a configuration with a one hour access token and a one day
    /// refresh token.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(1),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Signs a token of the given type for a user.
    pub fn issue(
        &self,
        user_id: UserId,
        username: &str,
        admin: bool,
        token_type: TokenType,
    ) -> Result<String> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            admin,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?)
    }

    /// Issues a fresh access/refresh pair.
    pub fn issue_pair(&self, user_id: UserId, username: &str, admin: bool) -> Result<TokenPair> {
        Ok(TokenPair {
            refresh: self.issue(user_id, username, admin, TokenType::Refresh)?,
            access: self.issue(user_id, username, admin, TokenType::Access)?,
        })
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl Claims {
    /// Parses the subject back into a user ID.
    pub fn user_id(&self) -> Result<UserId> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken(format!("bad subject '{}'", self.sub)))
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Tokens returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let config = TokenConfig::new("test-secret");
        let token = config
            .issue(UserId::new(4), "asha", true, TokenType::Access)
            .unwrap();

        let claims = config.verify(&token).unwrap();
        assert_eq!(claims.sub, "4");
        assert_eq!(claims.user_id().unwrap(), UserId::new(4));
        assert_eq!(claims.username, "asha");
        assert!(claims.admin);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenConfig::new("one")
            .issue(UserId::new(1), "u", false, TokenType::Access)
            .unwrap();
        let result = TokenConfig::new("two").verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = TokenConfig::new("secret").with_access_ttl(Duration::seconds(-120));
        let token = config
            .issue(UserId::new(1), "u", false, TokenType::Access)
            .unwrap();
        assert!(matches!(
            config.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn pair_contains_both_token_types() {
        let config = TokenConfig::new("secret");
        let pair = config.issue_pair(UserId::new(2), "ravi", false).unwrap();
        assert_eq!(
            config.verify(&pair.access).unwrap().token_type,
            TokenType::Access
        );
        assert_eq!(
            config.verify(&pair.refresh).unwrap().token_type,
            TokenType::Refresh
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let config = TokenConfig::new("secret");
        assert!(config.verify("not.a.jwt").is_err());
    }
}
