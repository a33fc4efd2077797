use thiserror::Error;

/// Environment variable names, matching the GitHub App's OAuth settings.
pub const APP_NAME_VAR: &str = "GITHUB_APP_NAME";
pub const CLIENT_ID_VAR: &str = "GITHUB_ID";
pub const CLIENT_SECRET_VAR: &str = "GITHUB_SECRET";
pub const REDIRECT_URL_VAR: &str = "GITHUB_REDIRECT_URL";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set (or was empty).
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
}

/// Required process configuration, read once at startup and passed into the
/// request handlers explicitly. All four values are mandatory and have no
/// defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The GitHub App's display name, used to build its installation URL.
    pub app_name: String,
    /// The OAuth application client ID.
    pub client_id: String,
    /// The OAuth application client secret.
    pub client_secret: String,
    /// The callback URL registered with GitHub.
    pub redirect_url: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function. Empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        Ok(Self {
            app_name: require(APP_NAME_VAR)?,
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
            redirect_url: require(REDIRECT_URL_VAR)?,
        })
    }
}
