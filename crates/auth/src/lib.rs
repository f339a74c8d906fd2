//! Authentication for the booking backend.
//!
//! The rest of the system only relies on the [`AuthService`] contract:
//! register or log in to get a [`TokenPair`], and turn an access token back
//! into an [`Identity`].

pub mod error;
pub mod memory;
pub mod password;
pub mod service;
pub mod token;

pub use error::{AuthError, Result};
pub use memory::InMemoryAuthService;
pub use service::{AuthService, Identity, Registration};
pub use token::{Claims, TokenConfig, TokenPair, TokenType};
