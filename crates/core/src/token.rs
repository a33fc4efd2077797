use serde::{Deserialize, Serialize};

/// Holds the access token returned by a code exchange.
///
/// GitHub's web flow returns neither a refresh token nor an expiry, so the
/// token lives only as long as the rendered page and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

impl TokenSet {
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            scope: None,
            token_type: None,
        }
    }
}
