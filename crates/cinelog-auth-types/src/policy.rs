//! Route authorization policy.
//!
//! Every (resource, action) pair maps to one [`Rule`]. The gate evaluates the
//! part of a rule that only needs the caller ([`Rule::admits`]); handlers
//! evaluate the part that needs the target record ([`Rule::check_subject`]).

use cinelog_domain::user::UserRole;
use uuid::Uuid;

use crate::identity::Identity;

const ADMIN: &[UserRole] = &[UserRole::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Film,
    Review,
    Watchlist,
    User,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Read,
    Create,
    Update,
    Delete,
    /// Assign a role to an account.
    ChangeRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Anyone; a valid credential is attached when present.
    Public,
    /// Any valid credential.
    Authenticated,
    /// A valid credential whose role is in the allow-list.
    Roles(&'static [UserRole]),
    /// The subject user themself, or a role in the allow-list.
    SelfOrRoles(&'static [UserRole]),
    /// The record's owner only. Enforced by owner-scoped queries.
    Owner,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyDenied {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

/// The rule guarding `action` on `resource`.
pub const fn rule_for(resource: Resource, action: Action) -> Rule {
    use Action::*;
    use Resource::*;

    match (resource, action) {
        (Session, _) => Rule::Public,

        (Film, List | Read) => Rule::Public,
        (Film, Create | Update | Delete) => Rule::Roles(ADMIN),

        (Review, List) => Rule::Public,
        (Review, Read | Create) => Rule::Authenticated,
        (Review, Update | Delete) => Rule::Owner,

        (Watchlist, List | Read) => Rule::Public,
        (Watchlist, Create) => Rule::Authenticated,
        (Watchlist, Update | Delete) => Rule::Owner,

        (User, Create) => Rule::Public,
        (User, List) => Rule::Roles(ADMIN),
        (User, Read | Update | Delete) => Rule::SelfOrRoles(ADMIN),
        (User | Film | Review | Watchlist, ChangeRole) => Rule::Roles(ADMIN),
    }
}

impl Rule {
    pub fn requires_identity(self) -> bool {
        !matches!(self, Self::Public)
    }

    /// Caller-only check, run by the gate before the handler.
    pub fn admits(self, identity: Option<&Identity>) -> Result<(), PolicyDenied> {
        if !self.requires_identity() {
            return Ok(());
        }
        let identity = identity.ok_or(PolicyDenied::Unauthenticated)?;
        match self {
            Self::Roles(allowed) if !allowed.contains(&identity.role) => {
                Err(PolicyDenied::Forbidden)
            }
            _ => Ok(()),
        }
    }

    /// Check the caller against the user the request targets.
    pub fn check_subject(self, identity: &Identity, subject: Uuid) -> Result<(), PolicyDenied> {
        match self {
            Self::Public | Self::Authenticated => Ok(()),
            Self::Roles(allowed) if allowed.contains(&identity.role) => Ok(()),
            Self::SelfOrRoles(allowed)
                if identity.user_id == subject || allowed.contains(&identity.role) =>
            {
                Ok(())
            }
            Self::Owner if identity.user_id == subject => Ok(()),
            _ => Err(PolicyDenied::Forbidden),
        }
    }
}
