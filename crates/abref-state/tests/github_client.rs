//! Wire-level tests for `GitHubChecksClient` against a mock GitHub API.

use abref_state::{
    CheckConclusion, CheckOutput, CheckRunId, CheckRunPayload, CheckRunStore, CheckStatus,
    GitHubChecksClient, GitHubConfig, RepoRef, StorageError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHECK_NAME: &str = "Azure Boards reference";
const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

fn client(server: &MockServer) -> GitHubChecksClient {
    GitHubChecksClient::new(GitHubConfig::new("ghs_test").with_api_url(&server.uri())).unwrap()
}

fn repo() -> RepoRef {
    RepoRef::new("octo", "widgets")
}

fn payload(conclusion: CheckConclusion) -> CheckRunPayload {
    CheckRunPayload {
        name: CHECK_NAME.to_string(),
        head_sha: SHA.to_string(),
        status: CheckStatus::Completed,
        conclusion: Some(conclusion),
        completed_at: None,
        output: CheckOutput {
            title: "Azure Boards reference found".to_string(),
            summary: "Work items referenced in this PR: AB#1".to_string(),
            text: Some("- AB#1".to_string()),
        },
    }
}

fn run_json(id: u64, conclusion: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": CHECK_NAME,
        "head_sha": SHA,
        "status": "completed",
        "conclusion": conclusion,
        "output": {
            "title": "Azure Boards reference found",
            "summary": "Work items referenced in this PR: AB#1",
            "text": "- AB#1"
        }
    })
}

#[tokio::test]
async fn find_by_name_requests_single_named_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/widgets/commits/{SHA}/check-runs")))
        .and(query_param("check_name", CHECK_NAME))
        .and(query_param("per_page", "1"))
        .and(header("authorization", "Bearer ghs_test"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "check_runs": [run_json(42, "success")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server)
        .find_by_name(&repo(), SHA, CHECK_NAME)
        .await
        .unwrap()
        .expect("check run should be found");

    assert_eq!(found.id, CheckRunId(42));
    assert_eq!(found.conclusion, Some(CheckConclusion::Success));
    assert_eq!(found.output.text.as_deref(), Some("- AB#1"));
}

#[tokio::test]
async fn find_by_name_returns_none_on_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/widgets/commits/{SHA}/check-runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 0,
            "check_runs": []
        })))
        .mount(&server)
        .await;

    let found = client(&server)
        .find_by_name(&repo(), SHA, CHECK_NAME)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn create_posts_completed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/check-runs"))
        .and(body_partial_json(json!({
            "name": CHECK_NAME,
            "head_sha": SHA,
            "status": "completed",
            "conclusion": "failure",
            "output": { "title": "Azure Boards reference found" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(run_json(7, "failure")))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create(&repo(), &payload(CheckConclusion::Failure))
        .await
        .unwrap();
    assert_eq!(created.id, CheckRunId(7));
    assert_eq!(created.status, CheckStatus::Completed);
}

#[tokio::test]
async fn update_patches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/widgets/check-runs/42"))
        .and(body_partial_json(json!({
            "name": CHECK_NAME,
            "status": "completed",
            "conclusion": "success"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json(42, "success")))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client(&server)
        .update(&repo(), CheckRunId(42), &payload(CheckConclusion::Success))
        .await
        .unwrap();
    assert_eq!(updated.id, CheckRunId(42));
}

#[tokio::test]
async fn forbidden_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "message": "Resource not accessible by integration" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .find_by_name(&repo(), SHA, CHECK_NAME)
        .await
        .unwrap_err();
    match err {
        StorageError::Unauthorized { message } => {
            assert_eq!(message, "Resource not accessible by integration")
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn unprocessable_maps_to_api_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Validation Failed"))
        .mount(&server)
        .await;

    let err = client(&server)
        .create(&repo(), &payload(CheckConclusion::Success))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Api { status: 422, ref message } if message == "Validation Failed"
    ));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = GitHubChecksClient::new(GitHubConfig::new("ghs_test").with_api_url(&uri)).unwrap();
    let err = client
        .find_by_name(&repo(), SHA, CHECK_NAME)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Transport(_)));
}
