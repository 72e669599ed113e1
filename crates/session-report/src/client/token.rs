use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer credential issued by the backend's login endpoint.
///
/// Passed explicitly to every request; `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    access_token: String,
}

impl BearerToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into().trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Returns the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
