//! Application services for identity resolution.

mod actor;

pub use actor::ActorResolver;
