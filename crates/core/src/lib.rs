use token::TokenSet;

pub mod config;
pub mod token;

/// Represents an error that can occur during OAuth operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the authorization code (the response body
    /// carried an `error` field).
    #[error("token exchange rejected by provider: {0}")]
    TokenExchangeFailed(String),

    /// A request to the provider failed at the transport or parsing level.
    #[error("provider request failed: {0}")]
    ProviderError(String),
}

/// Defines the behavior that any OAuth provider must implement.
#[async_trait::async_trait]
pub trait OAuthProvider {
    /// Returns the URL to initiate the OAuth authorization flow.
    fn auth_url(&self) -> String;

    /// Exchanges an authorization code for an access token.
    ///
    /// Authorization codes are single-use: a second exchange of the same
    /// code fails on the provider side, not here.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;
}
