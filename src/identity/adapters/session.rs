//! HS256 bearer session tokens.

use crate::config::{AuthConfig, ConfigLoadError};
use crate::identity::domain::{IdentityError, Principal, UserId};
use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject user identifier.
    pub sub: Uuid,
    /// Username at issue time.
    pub username: String,
    /// Role at issue time.
    pub role: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Returns the subject as a user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokenService {
    /// Creates a service signing with `secret` and issuing tokens valid for
    /// `ttl`.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // Expiry is checked against the injected clock in `verify`.
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Creates a service from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::InvalidSessionTtl`] when the configured
    /// lifetime is not a representable positive duration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigLoadError> {
        let ttl = Duration::try_hours(config.session_ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(ConfigLoadError::InvalidSessionTtl(config.session_ttl_hours))?;
        Ok(Self::new(&config.session_secret, ttl))
    }

    /// Issues a token for `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::SessionSigning`] when encoding fails.
    pub fn issue(&self, principal: &Principal, clock: &impl Clock) -> Result<String, IdentityError> {
        let issued_at = clock.utc();
        let claims = SessionClaims {
            sub: principal.id().into_inner(),
            username: principal.username().as_str().to_owned(),
            role: principal.role().as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| IdentityError::SessionSigning(err.to_string()))
    }

    /// Verifies a token's signature, then its expiry against `clock`, and
    /// returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidSessionToken`] when the signature does
    /// not verify or the token has expired.
    pub fn verify(
        &self,
        token: &str,
        clock: &impl Clock,
    ) -> Result<SessionClaims, IdentityError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| IdentityError::InvalidSessionToken(err.to_string()))?;
        if claims.exp <= clock.utc().timestamp() {
            return Err(IdentityError::InvalidSessionToken(
                "session token expired".to_owned(),
            ));
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
