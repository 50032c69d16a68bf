//! Identity provider boundary.
//!
//! Authentication is an external collaborator. The core only needs a stable
//! opaque user id to scope queries; display name, email and avatar ride
//! along for the chrome.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Profile with just an id, the only field the core requires.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            avatar_url: None,
        }
    }
}

/// External identity collaborator: current session plus sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, if any.
    async fn current_user(&self) -> Option<UserProfile>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;
}

/// In-process provider holding one session. Useful for tests and for
/// embedding the core behind an already-resolved session.
#[derive(Default)]
pub struct StaticIdentity {
    user: Mutex<Option<UserProfile>>,
}

impl StaticIdentity {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(profile: UserProfile) -> Self {
        Self {
            user: Mutex::new(Some(profile)),
        }
    }

    pub fn sign_in(&self, profile: UserProfile) {
        *self.user.lock().unwrap() = Some(profile);
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<UserProfile> {
        self.user.lock().unwrap().clone()
    }

    async fn sign_out(&self) -> Result<()> {
        self.user.lock().unwrap().take();
        Ok(())
    }
}
