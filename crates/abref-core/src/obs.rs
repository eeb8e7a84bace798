//! Structured log events for the invocation lifecycle.
//!
//! Every event carries an `event` field so JSON logs can be filtered
//! without parsing messages. Instrument an invocation with
//! [`invocation_span`] to tag all of them with the repository and head commit.

use tracing::{info, warn};

use crate::classifier::Verdict;
use crate::reconcile::ReconcileOutcome;

/// Span covering one invocation, for use with `Instrument`.
pub fn invocation_span(repository: &str, head_sha: &str) -> tracing::Span {
    tracing::info_span!("abref.invocation", repository = %repository, head_sha = %head_sha)
}

/// Emit event: draft pull request skipped.
pub fn emit_skipped(pr_number: u64) {
    info!(event = "invocation.skipped", pr_number = pr_number, "Skipping validation for draft PR");
}

/// Emit event: description classified.
pub fn emit_verdict(pr_number: u64, verdict: &Verdict) {
    let references: Vec<&str> = verdict.references().iter().map(|r| r.as_str()).collect();
    info!(
        event = "verdict.evaluated",
        pr_number = pr_number,
        verdict = verdict.kind(),
        passed = verdict.passed(),
        references = ?references,
    );
}

/// Emit event: check run created or updated.
pub fn emit_check_run_written(outcome: &ReconcileOutcome) {
    let record = outcome.record();
    info!(
        event = "check_run.written",
        action = outcome.action(),
        check_run_id = %record.id,
        conclusion = record.conclusion.map(|c| c.as_str()).unwrap_or("none"),
    );
}

/// Emit event: check run lookup or write failed (warning level).
pub fn emit_check_run_error(error: &dyn std::fmt::Display) {
    warn!(event = "check_run.error", error = %error);
}
