//! Acting principals and the explicit authentication mode of a request.

use super::{IdentityError, UserId, UserRole, Username};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    username: Username,
    role: UserRole,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, username: Username, role: UserRole) -> Self {
        Self { id, username, role }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username, used as the operator display name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Ensures the principal may mutate catalog data and read reports.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InsufficientPrivilege`] for operators.
    pub fn ensure_privileged(&self) -> Result<(), IdentityError> {
        if self.role.is_privileged() {
            return Ok(());
        }
        Err(IdentityError::InsufficientPrivilege {
            username: self.username.as_str().to_owned(),
            role: self.role,
        })
    }
}

/// How the acting user of a scan is identified.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Verify an explicit username and password.
    Credentials {
        /// Login name.
        username: String,
        /// Plain-text password.
        password: String,
    },
    /// Reuse the principal of the bearer-authenticated session.
    SessionPrincipal,
}

impl AuthMode {
    /// Creates a credentials-based mode.
    #[must_use]
    pub fn credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::SessionPrincipal => f.write_str("SessionPrincipal"),
        }
    }
}
