use serde::{Deserialize, Serialize};
use std::fmt;

/// One remote project workspace: base URL plus bearer credential.
///
/// Supplied by the caller on every call and never stored by the tool layer.
/// An empty field counts as absent; the validator rejects it before any
/// network activity.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEndpoint {
    base_url: String,
    token: String,
}

impl WorkspaceEndpoint {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn has_base_url(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Join a route such as `/api/editor/command` onto the base URL.
    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }
}

impl fmt::Debug for WorkspaceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceEndpoint")
            .field("base_url", &self.base_url)
            .field("token", &if self.has_token() { "<redacted>" } else { "<empty>" })
            .finish()
    }
}
