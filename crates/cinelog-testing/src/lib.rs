//! Test utilities for Cinelog services.
//!
//! Import in tests only; never in production code.

pub mod auth;
