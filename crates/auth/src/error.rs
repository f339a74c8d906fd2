use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The username is already registered.
    #[error("A user with username '{0}' already exists")]
    UsernameTaken(String),

    /// Registration data is incomplete.
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    /// Username or password did not match.
    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// The token is missing, malformed, expired or of the wrong type.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A token could not be signed.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
