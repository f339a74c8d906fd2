use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::{
    AuthError, Result, TokenPair,
    password::PasswordHash,
    service::{AuthService, Identity, Registration},
    token::{TokenConfig, TokenType},
};

#[derive(Debug, Clone)]
struct UserRecord {
    id: UserId,
    username: String,
    email: Option<String>,
    password: PasswordHash,
    is_admin: bool,
}

/// In-memory account store issuing JWTs.
///
/// Accounts are lost on restart, but tokens stay valid for as long as the
/// same secret is configured.
#[derive(Debug, Clone)]
pub struct InMemoryAuthService {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    next_id: Arc<AtomicI64>,
    tokens: TokenConfig,
}

impl InMemoryAuthService {
    pub fn new(tokens: TokenConfig) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            tokens,
        }
    }

    /// Creates an administrator account, replacing the password if the
    /// username already exists.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<UserId> {
        check_credentials(username, password)?;

        let mut users = self.users.write().await;
        if let Some(existing) = users.get_mut(username) {
            existing.password = PasswordHash::new(password);
            existing.is_admin = true;
            return Ok(existing.id);
        }

        let id = self.allocate_id();
        users.insert(
            username.to_string(),
            UserRecord {
                id,
                username: username.to_string(),
                email: None,
                password: PasswordHash::new(password),
                is_admin: true,
            },
        );
        tracing::info!(%username, user_id = %id, "seeded administrator account");
        Ok(id)
    }

    /// Number of registered accounts.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    fn allocate_id(&self) -> UserId {
        UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn issue(&self, user: &UserRecord) -> Result<TokenPair> {
        self.tokens
            .issue_pair(user.id, &user.username, user.is_admin)
    }
}

fn check_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AuthError::InvalidRegistration(
            "username must not be empty".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(AuthError::InvalidRegistration(
            "password must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthService for InMemoryAuthService {
    #[tracing::instrument(skip(self, registration), fields(username = %registration.username))]
    async fn register(&self, registration: Registration) -> Result<TokenPair> {
        check_credentials(&registration.username, &registration.password)?;

        let mut users = self.users.write().await;
        if users.contains_key(&registration.username) {
            return Err(AuthError::UsernameTaken(registration.username));
        }

        let user = UserRecord {
            id: self.allocate_id(),
            username: registration.username.clone(),
            email: registration.email,
            password: PasswordHash::new(&registration.password),
            is_admin: false,
        };
        let tokens = self.issue(&user)?;
        tracing::info!(user_id = %user.id, has_email = user.email.is_some(), "user registered");
        users.insert(registration.username, user);

        Ok(tokens)
    }

    #[tracing::instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let users = self.users.read().await;
        let user = users
            .get(username)
            .filter(|user| user.password.verify(password))
            .ok_or(AuthError::InvalidCredentials)?;

        self.issue(user)
    }

    async fn validate(&self, access_token: &str) -> Result<Identity> {
        let claims = self.tokens.verify(access_token)?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken(
                "expected an access token".to_string(),
            ));
        }

        Ok(Identity {
            user_id: claims.user_id()?,
            username: claims.username,
            is_admin: claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> InMemoryAuthService {
        InMemoryAuthService::new(TokenConfig::new("test-secret"))
    }

    #[tokio::test]
    async fn register_then_validate_access_token() {
        let auth = service();
        let tokens = auth
            .register(Registration::new("meera", "pa55word"))
            .await
            .unwrap();

        let identity = auth.validate(&tokens.access).await.unwrap();
        assert_eq!(identity.username, "meera");
        assert_eq!(identity.user_id, UserId::new(1));
        assert!(!identity.is_admin);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let auth = service();
        auth.register(Registration::new("meera", "one")).await.unwrap();

        let result = auth.register(Registration::new("meera", "two")).await;
        assert!(matches!(result, Err(AuthError::UsernameTaken(name)) if name == "meera"));
        assert_eq!(auth.user_count().await, 1);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let auth = service();
        assert!(matches!(
            auth.register(Registration::new("  ", "pw")).await,
            Err(AuthError::InvalidRegistration(_))
        ));
        assert!(matches!(
            auth.register(Registration::new("kiran", "")).await,
            Err(AuthError::InvalidRegistration(_))
        ));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let auth = service();
        auth.register(Registration::new("kiran", "hunter2"))
            .await
            .unwrap();

        assert!(auth.login("kiran", "hunter2").await.is_ok());
        assert!(matches!(
            auth.login("kiran", "hunter3").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "hunter2").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let auth = service();
        let tokens = auth
            .register(Registration::new("kiran", "hunter2"))
            .await
            .unwrap();

        assert!(matches!(
            auth.validate(&tokens.refresh).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn seeded_admin_gets_admin_identity() {
        let auth = service();
        let id = auth.seed_admin("admin", "admin-pw").await.unwrap();

        let tokens = auth.login("admin", "admin-pw").await.unwrap();
        let identity = auth.validate(&tokens.access).await.unwrap();
        assert_eq!(identity.user_id, id);
        assert!(identity.is_admin);
    }

    #[tokio::test]
    async fn seeding_existing_user_promotes_it() {
        let auth = service();
        auth.register(Registration::new("ops", "old")).await.unwrap();
        auth.seed_admin("ops", "new").await.unwrap();

        assert!(auth.login("ops", "old").await.is_err());
        let tokens = auth.login("ops", "new").await.unwrap();
        assert!(auth.validate(&tokens.access).await.unwrap().is_admin);
    }
}
