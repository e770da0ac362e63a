//! Current-user session state
//!
//! Single-user-at-a-time model: all store and cache reads are scoped to the
//! signed-in user, and mutations fail with [`CoreError::NotAuthenticated`]
//! when nobody is signed in.

use crate::error::CoreError;
use crate::models::UserId;
use parking_lot::RwLock;
use tracing::info;

#[derive(Debug, Default)]
pub struct AuthSession {
    current: RwLock<Option<UserId>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserId) {
        info!(user = %user, "User signed in");
        *self.current.write() = Some(user);
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current.write().take() {
            info!(user = %user, "User signed out");
        }
    }

    /// Currently signed-in user, if any
    pub fn current(&self) -> Option<UserId> {
        self.current.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current user, or `NotAuthenticated` naming the operation that
    /// needed one
    pub fn require(&self, operation: &str) -> Result<UserId, CoreError> {
        self.current().ok_or_else(|| CoreError::NotAuthenticated {
            operation: operation.to_string(),
        })
    }
}
