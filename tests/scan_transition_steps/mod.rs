//! Step definitions for scan transition and planning scenarios.

pub mod world;

mod given;
mod then;
mod when;
