//! Authentication and authorization shared by Cinelog services.
//!
//! Provides the bearer-token codec, the password hasher, the route policy
//! table, the authorization gate middleware and the `Identity` extractors.

pub mod gate;
pub mod identity;
pub mod password;
pub mod policy;
pub mod token;
