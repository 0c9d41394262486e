//! Shopfloor: QR-driven work-order tracking.
//!
//! This crate tracks physical work orders ("parts") through an ordered
//! sequence of manufacturing steps. Each step of a part is a process
//! instance carrying two single-purpose scan tokens: scanning the start token
//! begins the step, scanning the end token completes it and advances the part.
//!
//! # Architecture
//!
//! Shopfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, identity)
//!
//! # Modules
//!
//! - [`identity`]: Principals, roles, and credential or session resolution
//! - [`project`]: Project catalog with default step templates
//! - [`production`]: Step plans, the scan transition engine, progress and
//!   duration reporting
//! - [`config`], [`telemetry`], [`database`]: Startup configuration,
//!   structured logging, and connection pooling

pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod production;
pub mod project;
pub mod telemetry;
