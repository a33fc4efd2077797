use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use core_lib::AuthError;
use core_lib::config::AppConfig;
use github::{GitHubProvider, InstallationList, Repository};
use serde::Deserialize;

use crate::bootstrap::bootstrap;
use crate::page::IndexPage;

pub struct AppState {
    pub config: AppConfig,
    pub github: GitHubProvider,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/installations", get(list_installations))
        .route("/api/orgs/{org}/repos", get(list_org_repos))
        .with_state(state)
}

pub enum ApiError {
    MissingToken,
    Upstream(AuthError),
    Render(askama::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "Missing or malformed bearer token").into_response()
            }
            ApiError::Upstream(err) => {
                tracing::warn!(error = %err, "GitHub API call failed");
                (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
            }
            ApiError::Render(err) => {
                tracing::error!(error = %err, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
            }
        }
    }
}

#[derive(Deserialize)]
struct IndexQuery {
    code: Option<String>,
}

async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, ApiError> {
    let props = bootstrap(&state.github, &state.config, query.code.as_deref()).await;
    let page = IndexPage::from(props);
    Ok(Html(page.render().map_err(ApiError::Render)?))
}

// Extract the page-held token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get("Authorization")
        .ok_or(ApiError::MissingToken)?
        .to_str()
        .map_err(|_| ApiError::MissingToken)?;

    value.strip_prefix("Bearer ").ok_or(ApiError::MissingToken)
}

async fn list_installations(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<InstallationList>, ApiError> {
    let token = bearer_token(&headers)?;
    let installations = state
        .github
        .list_installations(token)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(installations))
}

async fn list_org_repos(
    State(state): State<Arc<AppState>>,
    Path(org): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Repository>>, ApiError> {
    let token = bearer_token(&headers)?;
    let repos = state
        .github
        .list_org_repos(token, &org)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(repos))
}
