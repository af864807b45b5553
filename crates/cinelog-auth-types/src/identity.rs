//! Request identity attached by the authorization gate.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use cinelog_domain::user::UserRole;
use http::request::Parts;
use uuid::Uuid;

use crate::gate::GateRejection;
use crate::token::TokenInfo;

/// The authenticated caller, inserted into request extensions by
/// [`gate`](crate::gate::gate).
///
/// Extracting `Identity` in a handler rejects with 401 when the request carried
/// no valid credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl From<TokenInfo> for Identity {
    fn from(info: TokenInfo) -> Self {
        Self {
            user_id: info.user_id,
            role: info.role,
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    // Extract synchronously and return a 'static future; an `async fn` here
    // would capture the `parts` lifetime.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<Identity>().copied();
        async move { identity.ok_or(GateRejection::MissingCredential) }
    }
}

/// The caller's identity when one was presented; `None` for anonymous requests
/// on public routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<Identity>().copied();
        async move { Ok(Self(identity)) }
    }
}
