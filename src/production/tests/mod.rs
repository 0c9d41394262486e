//! Unit tests for the production module.

mod support;
