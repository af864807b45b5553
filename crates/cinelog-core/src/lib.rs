//! Ambient plumbing shared by Cinelog services: the error envelope, tracing
//! setup, request-id layers, health handlers and sea-orm query helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
