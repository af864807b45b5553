use chrono::Utc;
use uuid::Uuid;

use cinelog_auth_types::identity::Identity;
use cinelog_auth_types::password::hash_password;
use cinelog_auth_types::policy::{Action, Resource, rule_for};
use cinelog_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, Violations, is_valid_email, normalize_email, validate_password};
use crate::error::CatalogError;

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, actor: &Identity, user_id: Uuid) -> Result<User, CatalogError> {
        rule_for(Resource::User, Action::Read).check_subject(actor, user_id)?;
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Partial profile update. Blank `phone`/`address` clear the field.
#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.role.is_none()
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Identity,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, CatalogError> {
        rule_for(Resource::User, Action::Update).check_subject(actor, user_id)?;
        if input.role.is_some() {
            rule_for(Resource::User, Action::ChangeRole).admits(Some(actor))?;
        }

        let email = input.email.as_deref().map(normalize_email);
        let name = input.name.as_deref().map(str::trim);
        let mut v = Violations::new();
        v.check(!input.is_empty(), "body", "at least one field is required");
        if let Some(email) = &email {
            v.check(is_valid_email(email), "email", "must be a valid email address");
        }
        if let Some(name) = name {
            v.check(!name.is_empty(), "name", "must not be empty");
        }
        if let Some(password) = &input.password {
            validate_password(&mut v, password);
        }
        v.finish()?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)?;

        if let Some(email) = email {
            if email != user.email {
                if self.repo.find_by_email(&email).await?.is_some() {
                    return Err(CatalogError::EmailTaken);
                }
                user.email = email;
            }
        }
        if let Some(name) = name {
            user.name = name.to_owned();
        }
        if let Some(password) = input.password {
            user.password_hash = hash_password(password).await?;
        }
        if let Some(phone) = input.phone {
            user.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(address) = input.address {
            user.address = Some(address).filter(|a| !a.trim().is_empty());
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: &Identity, user_id: Uuid) -> Result<(), CatalogError> {
        rule_for(Resource::User, Action::Delete).check_subject(actor, user_id)?;
        if !self.repo.delete(user_id).await? {
            return Err(CatalogError::UserNotFound);
        }
        Ok(())
    }
}
