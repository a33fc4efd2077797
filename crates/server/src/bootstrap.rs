use core_lib::{config::AppConfig, OAuthProvider};

/// Initial data for one page render. The token, when present, is embedded in
/// the page and held only in browser memory.
#[derive(Debug, Clone)]
pub struct PageProps {
    pub access_token: Option<String>,
    pub app_name: String,
    pub client_id: String,
    pub redirect_url: String,
}

/// Per-request session bootstrap.
///
/// With a callback `code` present the one-time exchange runs and its token
/// lands in the props; without it, or when the exchange fails, the page
/// renders logged out. The four configuration values are carried either way.
pub async fn bootstrap<P>(provider: &P, config: &AppConfig, code: Option<&str>) -> PageProps
where
    P: OAuthProvider + Sync,
{
    let access_token = match code {
        Some(code) => match provider.exchange_code(code).await {
            Ok(token) => Some(token.access_token),
            Err(err) => {
                tracing::warn!(error = %err, "token exchange failed, rendering logged out");
                None
            }
        },
        None => None,
    };

    PageProps {
        access_token,
        app_name: config.app_name.clone(),
        client_id: config.client_id.clone(),
        redirect_url: config.redirect_url.clone(),
    }
}
