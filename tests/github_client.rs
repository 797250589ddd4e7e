use viem_dependents::error::DependentsError;
use viem_dependents::github::GitHubClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get_test_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok()
}

#[tokio::test]
async fn test_github_client_creation() {
    let client = GitHubClient::new("test_token".to_string());
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_search_page_sends_headers_and_encoded_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "\"viem\" filename:package.json -is:archived"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "3"))
        .and(header("Authorization", "Bearer test_token"))
        .and(header("Accept", "application/vnd.github.v3.text-match+json"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": 2,
            "items": [
                {
                    "name": "package.json",
                    "path": "package.json",
                    "repository": { "full_name": "acme/wallet" }
                },
                {
                    "name": "package.json",
                    "path": "apps/web/package.json",
                    "repository": { "full_name": "solo/dapp" }
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test_token".to_string(), &mock_server.uri())
        .expect("Failed to create client");
    let names = client
        .search_code_page("\"viem\" filename:package.json -is:archived", 3)
        .await
        .expect("Search page failed");

    assert_eq!(names, vec!["acme/wallet".to_string(), "solo/dapp".to_string()]);
}

#[tokio::test]
async fn test_repository_info_maps_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/wallet"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "wallet",
            "full_name": "acme/wallet",
            "description": null,
            "html_url": "https://github.com/acme/wallet",
            "stargazers_count": 321,
            "language": "TypeScript",
            "created_at": "2023-01-02T03:04:05Z",
            "updated_at": "2024-06-07T08:09:10Z"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test_token".to_string(), &mock_server.uri())
        .expect("Failed to create client");
    let repo = client.get_repository_info("acme/wallet").await.expect("Detail fetch failed");

    assert_eq!(repo.name, "wallet");
    assert_eq!(repo.stargazers_count, 321);
    assert!(repo.description.is_none());
    assert_eq!(repo.language.as_deref(), Some("TypeScript"));
    assert_eq!(
        repo.created_at.map(|t| t.to_rfc3339()),
        Some("2023-01-02T03:04:05+00:00".to_string())
    );
}

#[tokio::test]
async fn test_repository_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/nonexistent/repository"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"message\":\"Not Found\"}"))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test_token".to_string(), &mock_server.uri())
        .expect("Failed to create client");
    let result = client.get_repository_info("nonexistent/repository").await;

    match result.unwrap_err() {
        error @ DependentsError::NotFound(_) => {
            assert_eq!(error.to_string(), "Resource not found: nonexistent/repository");
        }
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(403).set_body_string("secondary rate limit"))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test_token".to_string(), &mock_server.uri())
        .expect("Failed to create client");
    let result = client.search_code_page("viem", 1).await;

    match result.unwrap_err() {
        DependentsError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "secondary rate limit");
        }
        other => panic!("Expected HttpStatus error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_search_not_found_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"message\":\"Not Found\"}"))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test_token".to_string(), &mock_server.uri())
        .expect("Failed to create client");
    let result = client.search_code_page("viem", 1).await;

    match result.unwrap_err() {
        DependentsError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "{\"message\":\"Not Found\"}");
        }
        other => panic!("Expected HttpStatus error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_repo_format() {
    let client = GitHubClient::new("test_token".to_string()).expect("Failed to create client");

    let result = client.get_repository_info("invalid-format").await;

    match result.unwrap_err() {
        DependentsError::InvalidRepoName(_) => {}
        other => panic!("Expected InvalidRepoName error, got: {:?}", other),
    }
}

#[tokio::test]
#[ignore = "Requires valid GitHub token"]
async fn test_get_repository_info_live() {
    let token = get_test_token().expect("GITHUB_TOKEN not set");
    let client = GitHubClient::new(token).expect("Failed to create client");

    let repo = client.get_repository_info("wevm/viem").await
        .expect("Failed to get repository info");

    assert_eq!(repo.name, "viem");
    assert_eq!(repo.full_name, "wevm/viem");
    assert!(repo.stargazers_count > 0);
    assert!(!repo.html_url.is_empty());
}

#[tokio::test]
#[ignore = "Requires valid GitHub token"]
async fn test_search_code_page_live() {
    let token = get_test_token().expect("GITHUB_TOKEN not set");
    let client = GitHubClient::new(token).expect("Failed to create client");

    let names = client
        .search_code_page("\"viem\" filename:package.json -is:archived", 1)
        .await
        .expect("Failed to search code");

    assert!(!names.is_empty());
    assert!(names.iter().all(|name| name.contains('/')));
}
