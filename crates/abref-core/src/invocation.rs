//! One end-to-end evaluation of a pull request.
//!
//! [`run_invocation`] applies the draft skip, classifies the description,
//! reconciles the check run and hands back an [`InvocationReport`]. The
//! caller turns the report into outputs, a job summary and an exit code.

use abref_state::CheckRunStore;
use tracing::Instrument;

use crate::classifier::{classify, Verdict, WorkItemRef};
use crate::error::{AbrefError, Result};
use crate::event::InvocationInput;
use crate::obs;
use crate::reconcile::{reconcile, ReconcileOutcome};
use crate::report::missing_reference_message;

/// What happened during one invocation.
#[derive(Debug)]
pub enum InvocationReport {
    /// Draft pull request with `skip-drafts` on; nothing was evaluated.
    Skipped { pr_number: u64 },
    /// The description was classified and a check run write was attempted.
    Evaluated {
        pr_number: u64,
        verdict: Verdict,
        check_run: Result<ReconcileOutcome>,
    },
}

/// Final status reported to the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Passed,
    Skipped,
    Failed { message: String },
}

impl InvocationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InvocationOutcome::Failed { .. })
    }
}

impl InvocationReport {
    /// Verdict, if the description was evaluated.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            InvocationReport::Skipped { .. } => None,
            InvocationReport::Evaluated { verdict, .. } => Some(verdict),
        }
    }

    /// References to publish as the `ab-numbers` output.
    pub fn references(&self) -> &[WorkItemRef] {
        self.verdict().map(Verdict::references).unwrap_or(&[])
    }

    /// Pass only when the verdict passed and the check run was written.
    pub fn outcome(&self) -> InvocationOutcome {
        let (verdict, check_run) = match self {
            InvocationReport::Skipped { .. } => return InvocationOutcome::Skipped,
            InvocationReport::Evaluated {
                verdict, check_run, ..
            } => (verdict, check_run),
        };

        let mut messages = Vec::new();
        if !verdict.passed() {
            messages.push(missing_reference_message().to_string());
        }
        if let Err(e) = check_run {
            messages.push(e.to_string());
        }

        if messages.is_empty() {
            InvocationOutcome::Passed
        } else {
            InvocationOutcome::Failed {
                message: messages.join("\n"),
            }
        }
    }
}

/// The skip report when `skip-drafts` applies to this pull request.
///
/// `Ok(None)` means the description must be evaluated. Callers can use this
/// to avoid connecting to the check run store for skipped drafts.
pub fn draft_skip(input: &InvocationInput) -> Result<Option<InvocationReport>> {
    let pr = input
        .pull_request
        .as_ref()
        .ok_or(AbrefError::InvocationContext)?;

    if input.skip_drafts && pr.draft {
        obs::emit_skipped(pr.number);
        return Ok(Some(InvocationReport::Skipped {
            pr_number: pr.number,
        }));
    }
    Ok(None)
}

/// Evaluate the pull request in `input` and reconcile its check run.
///
/// Returns `Err` only when there is no pull request to evaluate. Check run
/// failures are recorded in the report so the verdict is never lost.
pub async fn run_invocation(
    store: &dyn CheckRunStore,
    input: &InvocationInput,
) -> Result<InvocationReport> {
    if let Some(skipped) = draft_skip(input)? {
        return Ok(skipped);
    }
    let pr = input
        .pull_request
        .as_ref()
        .ok_or(AbrefError::InvocationContext)?;

    let span = obs::invocation_span(&input.repository.to_string(), &pr.head_sha);
    async move {
        let verdict = classify(pr.body.as_deref().unwrap_or_default());
        obs::emit_verdict(pr.number, &verdict);

        let check_run = reconcile(store, &input.repository, &pr.head_sha, &verdict).await;
        match &check_run {
            Ok(outcome) => obs::emit_check_run_written(outcome),
            Err(e) => obs::emit_check_run_error(e),
        }

        Ok(InvocationReport::Evaluated {
            pr_number: pr.number,
            verdict,
            check_run,
        })
    }
    .instrument(span)
    .await
}
