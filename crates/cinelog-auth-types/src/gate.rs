//! Authorization gate middleware.
//!
//! Apply per route with
//! `.route_layer(axum::middleware::from_fn_with_state(Gate::new(codec, rule), gate))`.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use cinelog_core::error::error_response;

use crate::identity::Identity;
use crate::policy::{PolicyDenied, Rule};
use crate::token::{AuthError, TokenCodec};

/// Middleware state: the token codec plus the rule guarding one route.
#[derive(Clone)]
pub struct Gate {
    codec: TokenCodec,
    rule: Rule,
}

impl Gate {
    pub fn new(codec: TokenCodec, rule: Rule) -> Self {
        Self { codec, rule }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GateRejection {
    #[error("missing or malformed bearer credential")]
    MissingCredential,
    #[error("invalid credential: {0}")]
    InvalidCredential(#[from] AuthError),
    #[error("insufficient role")]
    Forbidden,
}

impl From<PolicyDenied> for GateRejection {
    fn from(denied: PolicyDenied) -> Self {
        match denied {
            PolicyDenied::Unauthenticated => Self::MissingCredential,
            PolicyDenied::Forbidden => Self::Forbidden,
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Forbidden => error_response(StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            _ => error_response(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", self.to_string()),
        }
    }
}

/// Validate the bearer credential and enforce the route's rule.
///
/// A valid credential is attached to the request as [`Identity`]. On public
/// routes a missing or invalid credential leaves the request anonymous.
pub async fn gate(
    State(gate): State<Gate>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateRejection> {
    let bearer = req.headers().typed_get::<Authorization<Bearer>>();

    let identity = match bearer {
        None => None,
        Some(Authorization(bearer)) => match gate.codec.verify(bearer.token()) {
            Ok(info) => Some(Identity::from(info)),
            Err(e) if gate.rule.requires_identity() => {
                tracing::debug!(error = %e, "rejected bearer credential");
                return Err(e.into());
            }
            Err(_) => None,
        },
    };

    gate.rule.admits(identity.as_ref())?;

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }
    Ok(next.run(req).await)
}
