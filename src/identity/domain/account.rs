//! Stored user account.

use super::{Principal, UserId, UserRole, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// User account record held by identity providers.
///
/// The password hash is a PHC-format string and never leaves the identity
/// adapter boundary through [`Principal`].
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    id: UserId,
    username: Username,
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates a new account from an already hashed password.
    #[must_use]
    pub fn new(
        username: Username,
        password_hash: String,
        role: UserRole,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash,
            role,
            created_at: clock.utc(),
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the PHC-format password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the principal view of this account.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.username.clone(), self.role)
    }
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
