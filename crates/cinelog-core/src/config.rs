//! Environment variable helpers for service configuration.

use std::str::FromStr;

use anyhow::Context;

/// Read a required environment variable.
pub fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing required env var {name}"))
}

/// Read an optional environment variable, falling back to `default` when it is
/// unset or does not parse.
pub fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
