use core_lib::{AuthError, OAuthProvider};
use github::GitHubProvider;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> GitHubProvider {
    GitHubProvider::with_base_urls(
        "Iv1.abc123".to_string(),
        "s3cret".to_string(),
        "http://localhost:3000".to_string(),
        server.uri(),
        server.uri(),
    )
}

#[tokio::test]
async fn test_exchange_code_returns_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({
            "client_id": "Iv1.abc123",
            "client_secret": "s3cret",
            "code": "one-time-code",
            "redirect_url": "http://localhost:3000",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gho_token",
            "scope": "repo",
            "token_type": "bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = provider_for(&server)
        .exchange_code("one-time-code")
        .await
        .expect("exchange should succeed");

    assert_eq!(token.access_token, "gho_token");
    assert_eq!(token.scope.as_deref(), Some("repo"));
}

#[tokio::test]
async fn test_exchange_code_error_body_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&server)
        .await;

    let result = provider_for(&server).exchange_code("stale-code").await;

    match result {
        Err(AuthError::TokenExchangeFailed(detail)) => {
            assert!(detail.contains("incorrect or expired"))
        }
        other => panic!("expected TokenExchangeFailed, got {:?}", other.map(|t| t.access_token)),
    }
}

#[tokio::test]
async fn test_exchange_code_transport_failure() {
    // Nothing is listening here.
    let provider = GitHubProvider::with_base_urls(
        "Iv1.abc123".to_string(),
        "s3cret".to_string(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:9".to_string(),
        "http://127.0.0.1:9".to_string(),
    );

    let result = provider.exchange_code("any-code").await;

    assert!(matches!(result, Err(AuthError::ProviderError(_))));
}

#[tokio::test]
async fn test_list_installations_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/installations"))
        .and(header("Authorization", "Bearer gho_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "installations": [
                {"id": 11, "account": {"id": 1, "login": "acme"}},
                {"id": 12, "account": {"id": 2, "login": "globex"}},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = provider_for(&server)
        .list_installations("gho_token")
        .await
        .expect("installations should load");

    assert_eq!(list.total_count, 2);
    assert_eq!(list.installations.len(), 2);
    assert_eq!(
        list.installations[0].account.as_ref().map(|a| a.login.as_str()),
        Some("acme")
    );
}

#[tokio::test]
async fn test_list_installations_sends_cache_bust() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/installations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "installations": [],
        })))
        .mount(&server)
        .await;

    provider_for(&server)
        .list_installations("gho_token")
        .await
        .expect("installations should load");

    let requests = server.received_requests().await.expect("requests recorded");
    let v = requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.to_string())
        .expect("cache-busting parameter present");
    assert!(v.parse::<i64>().is_ok(), "v should be a timestamp, got {v}");
}

#[tokio::test]
async fn test_list_installations_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/installations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = provider_for(&server).list_installations("expired").await;

    assert!(matches!(result, Err(AuthError::ProviderError(_))));
}

#[tokio::test]
async fn test_list_org_repos_first_page_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("type", "all"))
        .and(header("Authorization", "Bearer gho_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "full_name": "acme/widgets", "private": true, "visibility": "private"},
            {"id": 2, "full_name": "acme/site", "private": false, "visibility": "public"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = provider_for(&server)
        .list_org_repos("gho_token", "acme")
        .await
        .expect("repos should load");

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].id, 1);
    assert_eq!(repos[0].full_name, "acme/widgets");
    assert!(repos[0].private);
    assert_eq!(repos[1].id, 2);
    assert_eq!(repos[1].visibility, "public");
}

#[test]
fn test_auth_url_carries_scope_and_client() {
    let provider = GitHubProvider::new(
        "Iv1.abc123".to_string(),
        "s3cret".to_string(),
        "http://localhost:3000".to_string(),
    );

    assert_eq!(
        provider.auth_url(),
        "https://github.com/login/oauth/authorize?scope=repo&client_id=Iv1.abc123&redirect_uri=http://localhost:3000"
    );
}

#[test]
fn test_install_url() {
    let provider = GitHubProvider::new(
        "Iv1.abc123".to_string(),
        "s3cret".to_string(),
        "http://localhost:3000".to_string(),
    );

    assert_eq!(
        provider.install_url("demo-app"),
        "https://github.com/apps/demo-app/installations/new"
    );
}
