//! End-to-end pull request check scenarios against the in-memory store.

use abref_core::{
    run_invocation, InvocationInput, InvocationOutcome, InvocationReport, PullRequestContext,
    Verdict, CHECK_NAME,
};
use abref_state::fakes::{MemoryCheckRunStore, StoreCall};
use abref_state::{CheckConclusion, CheckStatus, RepoRef};

const SHA: &str = "9fceb02d0ae598e95dc970b74767f19372d61af8";

fn repo() -> RepoRef {
    RepoRef::new("contoso", "payments")
}

fn pr_input(body: &str) -> InvocationInput {
    InvocationInput {
        repository: repo(),
        pull_request: Some(PullRequestContext {
            number: 128,
            head_sha: SHA.to_string(),
            body: Some(body.to_string()),
            draft: false,
        }),
        skip_drafts: false,
    }
}

fn reference_strings(report: &InvocationReport) -> Vec<String> {
    report.references().iter().map(|r| r.to_string()).collect()
}

#[tokio::test]
async fn scenario_a_single_reference_passes() {
    let store = MemoryCheckRunStore::new();
    let report = run_invocation(&store, &pr_input("Fixed login issue as described in AB#123456"))
        .await
        .unwrap();

    assert_eq!(reference_strings(&report), vec!["AB#123456"]);
    assert_eq!(report.outcome(), InvocationOutcome::Passed);

    let runs = store.runs(&repo());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].name, CHECK_NAME);
    assert_eq!(runs[0].status, CheckStatus::Completed);
    assert_eq!(runs[0].conclusion, Some(CheckConclusion::Success));
    assert!(runs[0].output.summary.contains("AB#123456"));
}

#[tokio::test]
async fn scenario_b_exemption_passes() {
    let store = MemoryCheckRunStore::new();
    let report = run_invocation(&store, &pr_input("Updated documentation - no-ab"))
        .await
        .unwrap();

    assert_eq!(report.verdict(), Some(&Verdict::Exempted));
    assert!(report.references().is_empty());
    assert_eq!(report.outcome(), InvocationOutcome::Passed);
    assert_eq!(
        store.runs(&repo())[0].conclusion,
        Some(CheckConclusion::Success)
    );
}

#[tokio::test]
async fn scenario_c_missing_reference_fails_with_remedies() {
    let store = MemoryCheckRunStore::new();
    let report = run_invocation(&store, &pr_input("Minor typo fix"))
        .await
        .unwrap();

    assert_eq!(report.verdict(), Some(&Verdict::Missing));
    match report.outcome() {
        InvocationOutcome::Failed { message } => {
            assert!(message.contains("AB#123456"));
            assert!(message.contains("\"no-ab\""));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let runs = store.runs(&repo());
    assert_eq!(runs.len(), 1, "the failing verdict is still recorded");
    assert_eq!(runs[0].conclusion, Some(CheckConclusion::Failure));
}

#[tokio::test]
async fn scenario_d_references_beat_exemption() {
    let store = MemoryCheckRunStore::new();
    let report = run_invocation(&store, &pr_input("See AB#1 and AB#2, no-ab"))
        .await
        .unwrap();

    assert_eq!(reference_strings(&report), vec!["AB#1", "AB#2"]);
    assert_eq!(report.outcome(), InvocationOutcome::Passed);
}

#[tokio::test]
async fn scenario_e_draft_skipped_without_touching_store() {
    let store = MemoryCheckRunStore::new();
    let mut input = pr_input("Minor typo fix");
    input.skip_drafts = true;
    if let Some(pr) = input.pull_request.as_mut() {
        pr.draft = true;
    }

    let report = run_invocation(&store, &input).await.unwrap();

    assert!(matches!(report, InvocationReport::Skipped { pr_number: 128 }));
    assert_eq!(report.outcome(), InvocationOutcome::Skipped);
    assert!(report.references().is_empty());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn rerun_for_same_revision_updates_instead_of_duplicating() {
    let store = MemoryCheckRunStore::new();

    run_invocation(&store, &pr_input("Minor typo fix"))
        .await
        .unwrap();
    // Author edits the description and the workflow runs again.
    let second = run_invocation(&store, &pr_input("Minor typo fix, AB#77"))
        .await
        .unwrap();

    assert_eq!(second.outcome(), InvocationOutcome::Passed);
    let runs = store.runs(&repo());
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].conclusion, Some(CheckConclusion::Success));

    let calls = store.calls();
    assert!(matches!(calls[1], StoreCall::Create { .. }));
    assert_eq!(calls[3], StoreCall::Update { id: runs[0].id });
}

#[tokio::test]
async fn every_write_is_preceded_by_a_lookup() {
    let store = MemoryCheckRunStore::new();
    for body in ["AB#1", "no-ab", "nothing", "AB#2"] {
        run_invocation(&store, &pr_input(body)).await.unwrap();
    }

    let calls = store.calls();
    assert_eq!(calls.len(), 8);
    for pair in calls.chunks(2) {
        assert!(!pair[0].is_write());
        assert!(pair[1].is_write());
    }
}

#[tokio::test]
async fn query_failure_fails_invocation_without_writing() {
    let store = MemoryCheckRunStore::new().with_query_failure();
    let report = run_invocation(&store, &pr_input("AB#1")).await.unwrap();

    assert!(report.outcome().is_failure());
    assert_eq!(store.calls().len(), 1);
    assert!(store.runs(&repo()).is_empty());
}

#[tokio::test]
async fn write_failure_fails_passing_verdict() {
    let store = MemoryCheckRunStore::new().with_write_failure();
    let report = run_invocation(&store, &pr_input("AB#1")).await.unwrap();

    assert_eq!(reference_strings(&report), vec!["AB#1"]);
    match report.outcome() {
        InvocationOutcome::Failed { message } => {
            assert!(message.contains("failed to write check run"));
            assert!(!message.contains("Missing Azure Board Reference"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
