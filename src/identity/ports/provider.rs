//! Identity check consumed by scan and reporting services.

use crate::identity::domain::{IdentityError, Principal, UserId};
use async_trait::async_trait;

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// External identity check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] when the user is unknown
    /// or the password does not match.
    async fn verify_credentials(&self, username: &str, password: &str)
    -> IdentityResult<Principal>;

    /// Resolves the principal behind a bearer session token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidSessionToken`] when the token does not
    /// verify or [`IdentityError::UnknownSessionUser`] when its user has been
    /// removed.
    async fn resolve_bearer_principal(&self, bearer_token: &str) -> IdentityResult<Principal>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when no such user exists.
    async fn find_user(&self, id: UserId) -> IdentityResult<Option<Principal>>;
}
