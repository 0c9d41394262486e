//! Error types for identity validation and resolution.

use super::{UserId, UserRole};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while validating or resolving identities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the 100-character storage limit.
    #[error("username exceeds 100 character limit: {0}")]
    UsernameTooLong(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// A user with the same username already exists.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// The username/password pair did not match a user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session mode was requested without a bearer-authenticated principal.
    #[error("no authenticated session principal is present")]
    MissingSessionPrincipal,

    /// The bearer token is malformed, expired, or has a bad signature.
    #[error("invalid session token: {0}")]
    InvalidSessionToken(String),

    /// The bearer token names a user that no longer exists.
    #[error("session user {0} no longer exists")]
    UnknownSessionUser(UserId),

    /// The caller's role does not permit the operation.
    #[error("user '{username}' with role {role} lacks the required privilege")]
    InsufficientPrivilege {
        /// Acting username.
        username: String,
        /// Acting role.
        role: UserRole,
    },

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    PasswordHashing(String),

    /// Session token signing failed.
    #[error("session token signing failed: {0}")]
    SessionSigning(String),

    /// The identity store failed.
    #[error("identity store error: {0}")]
    Persistence(String),
}

impl IdentityError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong(_) | Self::EmptyPassword => {
                ErrorKind::Validation
            }
            Self::DuplicateUsername(_) => ErrorKind::Conflict,
            Self::InvalidCredentials
            | Self::MissingSessionPrincipal
            | Self::InvalidSessionToken(_)
            | Self::UnknownSessionUser(_) => ErrorKind::Authentication,
            Self::InsufficientPrivilege { .. } => ErrorKind::Authorization,
            Self::PasswordHashing(_) | Self::SessionSigning(_) | Self::Persistence(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

/// Error returned while parsing a user role from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);
