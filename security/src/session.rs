// security/src/session.rs

use chrono::{DateTime, Utc};
use log::warn;
use models::errors::{ApiError, ApiResult};
use models::medical::{ProfileChanges, Role, UserProfile};
use serde::{Deserialize, Serialize};

use crate::navigation::{initial_screen, Screen};
use crate::roles::{has_permission, Action};

/// The signed-in account. The services hand out no token, so the profile
/// returned by the login call is the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserProfile) -> Self {
        Session { user, signed_in_at: Utc::now() }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn home(&self) -> Screen {
        initial_screen(self.role())
    }

    pub fn can(&self, action: Action) -> bool {
        has_permission(self.role(), action)
    }

    /// Fails with `Forbidden` when the role may not perform `action`.
    pub fn guard(&self, action: Action) -> ApiResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            warn!("{} {} denied {}", self.role(), self.user.id, action);
            Err(ApiError::Forbidden(format!(
                "{} accounts cannot {}",
                self.role(),
                action.as_str().replace('_', " ")
            )))
        }
    }

    /// Mirrors a saved profile edit into the session copy.
    pub fn apply(&mut self, changes: &ProfileChanges) {
        changes.apply_to(&mut self.user);
    }
}
