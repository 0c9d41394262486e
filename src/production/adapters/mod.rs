//! Adapter implementations for production ports.

pub mod memory;
pub mod postgres;
