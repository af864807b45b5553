use axum::extract::{Path, RawQuery, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use cinelog_auth_types::identity::Identity;
use cinelog_domain::pagination::Page;
use cinelog_domain::user::{UserRole, UserSortField};

use crate::domain::types::{ListQuery, OTP_LEN, User, UserFilter, normalize_search};
use crate::error::CatalogError;
use crate::handlers::{IdPath, JsonBody, ListParams};
use crate::state::AppState;
use crate::usecase::auth::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, VerifyLoginInput,
    VerifyLoginUseCase,
};
use crate::usecase::listing::ListUseCase;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, UpdateUserInput, UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of an account; the password hash is never serialized.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users/register ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<RegisterRequest>,
) -> Result<Json<UserResponse>, CatalogError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            name: body.name,
            phone: body.phone,
            address: body.address,
        })
        .await?;
    Ok(Json(user.into()))
}

// ── POST /users/login ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    /// Seconds until the login code expires.
    pub expires_in: i64,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, CatalogError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
        mailer: state.mailer(),
        otp_ttl: state.otp_ttl,
    };
    let outcome = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        message: "login code sent, submit it to /users/verify-login",
        expires_in: state.otp_ttl.num_seconds(),
        expires_at: outcome.expires_at,
    }))
}

// ── POST /users/verify-login ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyLoginRequest {
    pub email: String,
    #[serde(deserialize_with = "login_code")]
    pub code: String,
}

/// A login code sent as `"012345"` or as the number `12345`. Numbers are
/// zero-padded to the code length.
fn login_code<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Text(code) => code,
        Raw::Number(n) => format!("{n:0width$}", width = OTP_LEN),
    })
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    #[serde(serialize_with = "cinelog_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserResponse,
}

pub async fn verify_login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<VerifyLoginRequest>,
) -> Result<Json<SessionResponse>, CatalogError> {
    let usecase = VerifyLoginUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
        tokens: state.tokens.clone(),
    };
    let session = usecase
        .execute(VerifyLoginInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok(Json(SessionResponse {
        token: session.token.token,
        expires_at: session.token.expires_at,
        user: session.user.into(),
    }))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<UserResponse>>, CatalogError> {
    let params = ListParams::parse(raw_query.as_deref())?;
    let query: ListQuery<UserFilter, UserSortField> = params.into_query(UserFilter {
        search: normalize_search(params.search.as_deref()),
    });
    let usecase = ListUseCase {
        repo: state.user_repo(),
    };
    let page = usecase.execute(query).await?;
    Ok(Json(page.map(UserResponse::from)))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
) -> Result<Json<UserResponse>, CatalogError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&identity, user_id).await?;
    Ok(Json(user.into()))
}

// ── PUT /users/{id} ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
}

pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
    WithRejection(Json(body), _): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, CatalogError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &identity,
            user_id,
            UpdateUserInput {
                name: body.name,
                email: body.email,
                password: body.password,
                phone: body.phone,
                address: body.address,
                role: body.role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
) -> Result<StatusCode, CatalogError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&identity, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
