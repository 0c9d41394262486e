//! Resolution of the acting principal for scan requests.

use crate::identity::{
    domain::{AuthMode, IdentityError, Principal},
    ports::{IdentityProvider, IdentityResult},
};
use std::sync::Arc;

/// Resolves an [`AuthMode`] into the principal performing a scan.
#[derive(Clone)]
pub struct ActorResolver<I>
where
    I: IdentityProvider,
{
    identity: Arc<I>,
}

impl<I> ActorResolver<I>
where
    I: IdentityProvider,
{
    /// Creates a resolver backed by `identity`.
    #[must_use]
    pub const fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }

    /// Resolves the acting principal.
    ///
    /// With [`AuthMode::Credentials`] the username/password pair is verified
    /// and `bearer_token` is ignored. With [`AuthMode::SessionPrincipal`] the
    /// credential check is skipped and the bearer token's principal is used.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingSessionPrincipal`] when session mode is
    /// requested without a bearer token, or the provider's authentication
    /// error otherwise.
    pub async fn resolve(
        &self,
        mode: &AuthMode,
        bearer_token: Option<&str>,
    ) -> IdentityResult<Principal> {
        let resolved = self.resolve_mode(mode, bearer_token).await;
        match &resolved {
            Ok(principal) => {
                tracing::debug!(?mode, username = %principal.username(), "actor resolved");
            }
            Err(err) => tracing::warn!(?mode, error = %err, "actor resolution failed"),
        }
        resolved
    }

    async fn resolve_mode(
        &self,
        mode: &AuthMode,
        bearer_token: Option<&str>,
    ) -> IdentityResult<Principal> {
        match mode {
            AuthMode::Credentials { username, password } => {
                self.identity.verify_credentials(username, password).await
            }
            AuthMode::SessionPrincipal => {
                let token = bearer_token
                    .filter(|token| !token.trim().is_empty())
                    .ok_or(IdentityError::MissingSessionPrincipal)?;
                self.identity.resolve_bearer_principal(token).await
            }
        }
    }
}
