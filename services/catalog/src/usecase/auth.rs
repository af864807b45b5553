use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use cinelog_auth_types::password::{hash_password, verify_password};
use cinelog_auth_types::token::{IssuedToken, TokenCodec};
use cinelog_domain::user::UserRole;

use crate::domain::repository::{Mailer, OtpRepository, UserRepository};
use crate::domain::types::{
    MAX_OTP_ATTEMPTS, OTP_LEN, OneTimeCode, OutboxEvent, User, Violations, is_valid_email,
    normalize_email, validate_password,
};
use crate::error::CatalogError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUseCase<U> {
    /// New accounts are always `client`s.
    pub async fn execute(&self, input: RegisterInput) -> Result<User, CatalogError> {
        let email = normalize_email(&input.email);
        let name = input.name.trim().to_owned();
        let mut v = Violations::new();
        v.check(is_valid_email(&email), "email", "must be a valid email address");
        v.check(!name.is_empty(), "name", "must not be empty");
        validate_password(&mut v, &input.password);
        v.finish()?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CatalogError::EmailTaken);
        }

        let password_hash = hash_password(input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email,
            name,
            password_hash,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            address: input.address.filter(|a| !a.trim().is_empty()),
            role: UserRole::Client,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── Login (step 1: password, send code) ─────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub expires_at: DateTime<Utc>,
}

pub struct LoginUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpRepository,
    M: Mailer,
{
    pub users: U,
    pub otps: O,
    pub mailer: M,
    pub otp_ttl: Duration,
}

impl<U, O, M> LoginUseCase<U, O, M>
where
    U: UserRepository,
    O: OtpRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutcome, CatalogError> {
        let email = normalize_email(&input.email);
        let mut v = Violations::new();
        v.check(!email.is_empty(), "email", "must not be empty");
        v.check(!input.password.is_empty(), "password", "must not be empty");
        v.finish()?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(CatalogError::UserNotFound)?;

        if !verify_password(input.password, user.password_hash.clone()).await {
            return Err(CatalogError::InvalidCredentials);
        }

        let now = Utc::now();
        let code = OneTimeCode {
            user_id: user.id,
            code: generate_code(),
            attempts: 0,
            created_at: now,
            expires_at: now + self.otp_ttl,
        };
        self.otps.upsert(&code).await?;

        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: "login_code_created".to_owned(),
            payload: json!({
                "email": user.email,
                "name": user.name,
                "code": code.code,
                "expires_at": code.expires_at,
            }),
            idempotency_key: format!("login_code_created:{}:{}", user.id, now.timestamp_millis()),
        };
        // Dispatch failures are logged only; the code is already stored.
        if let Err(e) = self.mailer.send(&event).await {
            tracing::warn!(error = %e, user_id = %user.id, "failed to dispatch login code");
        }

        Ok(LoginOutcome {
            expires_at: code.expires_at,
        })
    }
}

// ── VerifyLogin (step 2: code, issue token) ──────────────────────────────────

pub struct VerifyLoginInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct Session {
    pub token: IssuedToken,
    pub user: User,
}

pub struct VerifyLoginUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub users: U,
    pub otps: O,
    pub tokens: TokenCodec,
}

impl<U, O> VerifyLoginUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub async fn execute(&self, input: VerifyLoginInput) -> Result<Session, CatalogError> {
        let email = normalize_email(&input.email);
        let submitted = input.code.trim();
        let mut v = Violations::new();
        v.check(!email.is_empty(), "email", "must not be empty");
        v.check(!submitted.is_empty(), "code", "must not be empty");
        v.finish()?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(CatalogError::UserNotFound)?;

        let stored = self
            .otps
            .find(user.id)
            .await?
            .ok_or(CatalogError::OtpNotFound)?;

        if stored.is_expired_at(Utc::now()) {
            self.otps.delete(user.id).await?;
            return Err(CatalogError::OtpExpired);
        }
        if stored.code != submitted {
            if self.otps.record_miss(user.id).await? >= MAX_OTP_ATTEMPTS {
                self.otps.delete(user.id).await?;
            }
            return Err(CatalogError::InvalidOtp);
        }

        self.otps.delete(user.id).await?;
        let token = self
            .tokens
            .issue(user.id, user.role)
            .context("issue access token")?;
        Ok(Session { token, user })
    }
}
