//! Domain model for operator and manager identities.

mod account;
mod error;
mod ids;
mod principal;
mod role;

pub use account::UserAccount;
pub use error::{IdentityError, ParseUserRoleError};
pub use ids::{UserId, Username};
pub use principal::{AuthMode, Principal};
pub use role::UserRole;
