use ado_heatmap::azure::{AzureClient, CommitQuery, DevOpsApi};
use ado_heatmap::{Config, HeatmapError};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64(":pat"), Azure DevOps expects an empty user name
const BASIC_PAT: &str = "Basic OnBhdA==";

/// Runs the blocking client off the async worker threads.
async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(AzureClient) -> T + Send + 'static,
{
    let config = Config::new("acme", "pat").with_base_url(server.uri());
    tokio::task::spawn_blocking(move || f(AzureClient::new(&config).unwrap()))
        .await
        .unwrap()
}

fn query() -> CommitQuery<'static> {
    CommitQuery {
        from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap(),
        author: Some("dev@example.com"),
        top: 100,
        skip: 0,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn requests_carry_basic_auth_with_empty_user_and_api_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/_apis/projects"))
        .and(header("authorization", BASIC_PAT))
        .and(header("accept", "application/json"))
        .and(query_param("api-version", "7.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"count":1,"value":[{"id":"p1","name":"Core"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let projects = with_client(&server, |c| c.list_projects()).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Core");
}

#[tokio::test(flavor = "multi_thread")]
async fn projects_follow_the_continuation_header() {
    let server = MockServer::start().await;
    // Mounted first so it wins over the unqualified first-page mock
    Mock::given(method("GET"))
        .and(path("/acme/_apis/projects"))
        .and(query_param("continuationToken", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"count":1,"value":[{"id":"p2","name":"Second"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acme/_apis/projects"))
        .and(query_param("$top", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ms-continuationtoken", "abc")
                .set_body_string(r#"{"count":1,"value":[{"id":"p1","name":"First"}]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let projects = with_client(&server, |c| c.list_projects()).await.unwrap();
    let names: Vec<String> = projects.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "continuationToken"));
    assert!(requests[1]
        .url
        .query_pairs()
        .any(|(k, v)| k == "continuationToken" && v == "abc"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_organization_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/_apis/projects"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.list_projects()).await.unwrap_err();
    assert!(matches!(err, HeatmapError::Status { status: 404, .. }), "got {err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn sign_in_page_is_reported_with_a_token_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/_apis/projects"))
        .respond_with(
            ResponseTemplate::new(203)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>Sign In</html>"),
        )
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.list_projects()).await.unwrap_err();
    assert!(matches!(err, HeatmapError::Status { status: 203, .. }), "got {err}");
    assert!(err.to_string().contains("AZURE_DEVOPS_PAT"), "got {err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn forbidden_names_the_missing_scopes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/Core/_apis/git/repositories"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.list_repositories("Core")).await.unwrap_err();
    assert!(err.to_string().contains("Code (Read)"), "got {err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_repositories_and_commits_read_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/Core/_apis/git/repositories"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/acme/Core/_apis/git/repositories/r1/commits"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (repos, commits) = with_client(&server, |c| {
        (c.list_repositories("Core"), c.list_commits("Core", "r1", &query()))
    })
    .await;
    assert!(repos.unwrap().is_empty());
    assert!(commits.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn commits_are_requested_with_window_author_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/Core/_apis/git/repositories/r1/commits"))
        .and(header("authorization", BASIC_PAT))
        .and(query_param("searchCriteria.fromDate", "2024-01-01T00:00:00+00:00"))
        .and(query_param("searchCriteria.toDate", "2024-12-31T23:59:59+00:00"))
        .and(query_param("searchCriteria.author", "dev@example.com"))
        .and(query_param("$top", "100"))
        .and(query_param("$skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"count":1,"value":[{"commitId":"c1","author":{"name":"Dev","email":"dev@example.com","date":"2024-03-01T23:30:00-02:00"}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let commits = with_client(&server, |c| c.list_commits("Core", "r1", &query()))
        .await
        .unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].commit_id, "c1");
    // author date is normalised to UTC before it is bucketed
    assert_eq!(commits[0].day().to_string(), "2024-03-02");
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_are_not_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/Core/_apis/git/repositories/r1/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = with_client(&server, |c| c.list_commits("Core", "r1", &query()))
        .await
        .unwrap_err();
    assert!(matches!(err, HeatmapError::Status { status: 500, .. }), "got {err}");
}
