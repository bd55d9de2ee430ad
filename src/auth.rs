//! Seam to the authentication collaborator.
//!
//! The core only ever *reads* the bearer token; login, refresh, and
//! logout-on-401 live in the embedding app. Token absence is reported
//! to the caller, never acted on here.

use std::sync::RwLock;

/// Read-only view of the current session's bearer token.
pub trait TokenProvider: Send + Sync {
    /// The access token to attach to API calls, if any.
    fn current_bearer_token(&self) -> Option<String>;
}

/// In-memory token holder for tests and embedding apps that manage the
/// token themselves.
#[derive(Debug, Default)]
pub struct StaticTokens {
    token: RwLock<Option<String>>,
}

impl StaticTokens {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}

impl TokenProvider for StaticTokens {
    fn current_bearer_token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }
}
