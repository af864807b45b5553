//! Bearer-token helpers for integration tests.
//!
//! Tests build the service with [`test_codec`] and sign requests with
//! [`MockAuth`], so no login round-trip is needed.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use chrono::Duration;
use cinelog_auth_types::token::TokenCodec;
use cinelog_domain::user::UserRole;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "cinelog-test-secret";

/// The codec services under test should be built with.
pub fn test_codec() -> TokenCodec {
    TokenCodec::new(TEST_JWT_SECRET, Duration::hours(1))
}

/// Configurable identity signed into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn client() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Client)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// A token signed with [`TEST_JWT_SECRET`].
    pub fn token(&self) -> String {
        test_codec()
            .issue(self.user_id, self.role)
            .expect("test token should sign")
            .token
    }

    /// `Authorization: Bearer <token>` as a header map.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap(),
        );
        map
    }
}
