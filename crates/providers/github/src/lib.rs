use chrono::Utc;
use core_lib::{token::TokenSet, AuthError, OAuthProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GITHUB_WEB_URL: &str = "https://github.com";
const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("github-org-installer/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_url: &'a str,
}

#[derive(Deserialize, Debug)]
struct TokenExchangeReply {
    access_token: Option<String>,
    scope: Option<String>,
    token_type: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// An account (organization or user) an installation belongs to.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub login: String,
}

/// One binding of the GitHub App to an account.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Installation {
    pub id: u64,
    pub account: Option<Account>,
}

/// First page of the authenticated user's installations.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InstallationList {
    pub total_count: u64,
    pub installations: Vec<Installation>,
}

/// Repository summary, as rendered in the page's table.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    pub private: bool,
    #[serde(default)]
    pub visibility: String,
}

pub struct GitHubProvider {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    client: Client,
    web_base: String,
    api_base: String,
}

impl GitHubProvider {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            redirect_url,
            GITHUB_WEB_URL.to_string(),
            GITHUB_API_URL.to_string(),
        )
    }

    /// Construct a provider pointed at alternate endpoints. Used by tests to
    /// target a mock server; production code uses [`GitHubProvider::new`].
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        redirect_url: String,
        web_base: String,
        api_base: String,
    ) -> Self {
        GitHubProvider {
            client_id,
            client_secret,
            redirect_url,
            client: Self::build_client(),
            web_base,
            api_base,
        }
    }

    fn build_client() -> Client {
        // GitHub's API rejects requests without a User-Agent.
        Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    /// The GitHub App's installation page, opened by the page's popup.
    pub fn install_url(&self, app_name: &str) -> String {
        format!("{}/apps/{}/installations/new", self.web_base, app_name)
    }

    /// Lists the organizations where the authenticated user has installed
    /// the App. Only the first page the endpoint returns is used.
    pub async fn list_installations(
        &self,
        access_token: &str,
    ) -> Result<InstallationList, AuthError> {
        // Cache-busting parameter so intermediate HTTP caches never serve a
        // stale list right after an install.
        let cache_bust = Utc::now().timestamp_millis().to_string();

        let res = self
            .client
            .get(format!("{}/user/installations", self.api_base))
            .query(&[("v", cache_bust.as_str())])
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Accept", GITHUB_JSON)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "installation list request failed");
                AuthError::ProviderError(format!("installation list request failed: {err}"))
            })?
            .error_for_status()
            .map_err(|err| {
                AuthError::ProviderError(format!("installation list request failed: {err}"))
            })?;

        res.json().await.map_err(|err| {
            AuthError::ProviderError(format!("error parsing installation list: {err}"))
        })
    }

    /// Lists an organization's repositories, all types, 100 per page. Only
    /// the first page is retrieved; organizations with more than 100
    /// repositories show a truncated list.
    pub async fn list_org_repos(
        &self,
        access_token: &str,
        org: &str,
    ) -> Result<Vec<Repository>, AuthError> {
        let res = self
            .client
            .get(format!("{}/orgs/{}/repos", self.api_base, org))
            .query(&[("per_page", "100"), ("type", "all")])
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Accept", GITHUB_JSON)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, org, "repository list request failed");
                AuthError::ProviderError(format!("repository list request failed: {err}"))
            })?
            .error_for_status()
            .map_err(|err| {
                AuthError::ProviderError(format!("repository list request failed: {err}"))
            })?;

        res.json().await.map_err(|err| {
            AuthError::ProviderError(format!("error parsing repository list: {err}"))
        })
    }
}

#[async_trait::async_trait]
impl OAuthProvider for GitHubProvider {
    fn auth_url(&self) -> String {
        format!(
            "{}/login/oauth/authorize?scope=repo&client_id={}&redirect_uri={}",
            self.web_base, self.client_id, self.redirect_url
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let request = TokenExchangeRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
            redirect_url: &self.redirect_url,
        };

        let res = self
            .client
            .post(format!("{}/login/oauth/access_token", self.web_base))
            .json(&request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "token exchange request failed");
                AuthError::ProviderError(format!("token exchange request failed: {err}"))
            })?;

        let reply: TokenExchangeReply = res.json().await.map_err(|err| {
            AuthError::ProviderError(format!("error parsing token response: {err}"))
        })?;

        if let Some(error) = reply.error {
            let detail = reply.error_description.unwrap_or(error);
            return Err(AuthError::TokenExchangeFailed(detail));
        }

        let access_token = reply.access_token.ok_or_else(|| {
            AuthError::ProviderError("token response carried neither token nor error".to_string())
        })?;

        Ok(TokenSet {
            access_token,
            scope: reply.scope,
            token_type: reply.token_type,
        })
    }
}
