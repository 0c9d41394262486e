//! In-memory identity provider.

use super::password::{hash_password, verify_password};
use super::session::SessionTokenService;
use crate::identity::{
    domain::{IdentityError, Principal, UserAccount, UserId, UserRole, Username},
    ports::{IdentityProvider, IdentityResult},
};
use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Principal and bearer token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    /// Authenticated principal.
    pub principal: Principal,
    /// Signed bearer token.
    pub token: String,
}

/// Thread-safe in-memory identity provider.
#[derive(Clone)]
pub struct InMemoryIdentityProvider<C>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryIdentityState>>,
    sessions: SessionTokenService,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    accounts: HashMap<UserId, UserAccount>,
    username_index: HashMap<Username, UserId>,
}

fn poisoned(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::Persistence(err.to_string())
}

impl<C> InMemoryIdentityProvider<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty provider issuing tokens with `sessions`.
    #[must_use]
    pub fn new(sessions: SessionTokenService, clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryIdentityState::default())),
            sessions,
            clock,
        }
    }

    /// Registers a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the username or password is invalid or
    /// the username is already taken.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> IdentityResult<UserAccount> {
        let name = Username::new(username)?;
        let password_hash = hash_password(password)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.username_index.contains_key(&name) {
            return Err(IdentityError::DuplicateUsername(name.as_str().to_owned()));
        }
        let account = UserAccount::new(name, password_hash, role, &*self.clock);
        state
            .username_index
            .insert(account.username().clone(), account.id());
        state.accounts.insert(account.id(), account.clone());
        tracing::info!(user_id = %account.id(), role = %role, "registered user");
        Ok(account)
    }

    /// Verifies credentials and issues a bearer session token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] when verification fails.
    pub fn login(&self, username: &str, password: &str) -> IdentityResult<SessionGrant> {
        let principal = self.check_credentials(username, password)?;
        let token = self.sessions.issue(&principal, &*self.clock)?;
        Ok(SessionGrant { principal, token })
    }

    /// Removes a user account, invalidating its outstanding sessions.
    ///
    /// Returns whether an account was removed.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Persistence`] when the store lock is poisoned.
    pub fn remove_user(&self, id: UserId) -> IdentityResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(account) = state.accounts.remove(&id) else {
            return Ok(false);
        };
        state.username_index.remove(account.username());
        Ok(true)
    }

    fn check_credentials(&self, username: &str, password: &str) -> IdentityResult<Principal> {
        let Ok(name) = Username::new(username) else {
            return Err(IdentityError::InvalidCredentials);
        };
        let state = self.state.read().map_err(poisoned)?;
        let account = state
            .username_index
            .get(&name)
            .and_then(|id| state.accounts.get(id))
            .ok_or(IdentityError::InvalidCredentials)?;
        if !verify_password(password, account.password_hash()) {
            tracing::warn!(username = %name, "rejected credentials");
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(account.principal())
    }
}

#[async_trait]
impl<C> IdentityProvider for InMemoryIdentityProvider<C>
where
    C: Clock + Send + Sync,
{
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> IdentityResult<Principal> {
        self.check_credentials(username, password)
    }

    async fn resolve_bearer_principal(&self, bearer_token: &str) -> IdentityResult<Principal> {
        let claims = self.sessions.verify(bearer_token, &*self.clock)?;
        let user_id = claims.user_id();
        let state = self.state.read().map_err(poisoned)?;
        state
            .accounts
            .get(&user_id)
            .map(UserAccount::principal)
            .ok_or(IdentityError::UnknownSessionUser(user_id))
    }

    async fn find_user(&self, id: UserId) -> IdentityResult<Option<Principal>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.accounts.get(&id).map(UserAccount::principal))
    }
}
