//! Check run reconciliation.
//!
//! Brings the single check run named [`CHECK_NAME`] on a head commit in line
//! with a [`Verdict`]: look it up first, then update it in place when found
//! or create it otherwise. Re-running for the same commit converges on one
//! check run instead of piling up duplicates.
//!
//! Two evaluations of the same commit running at the same moment can both
//! miss the lookup and both create. The Checks API has no conditional
//! create, so that window stays open.

use abref_state::{CheckRunPayload, CheckRunRecord, CheckRunStore, CheckStatus, RepoRef};
use chrono::Utc;
use tracing::debug;

use crate::classifier::Verdict;
use crate::error::{AbrefError, Result};
use crate::report::check_output;

/// Name of the check run this tool owns on every commit.
pub const CHECK_NAME: &str = "Azure Boards reference";

/// Which write the reconciler performed.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Created(CheckRunRecord),
    Updated(CheckRunRecord),
}

impl ReconcileOutcome {
    pub fn record(&self) -> &CheckRunRecord {
        match self {
            ReconcileOutcome::Created(record) | ReconcileOutcome::Updated(record) => record,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created(_) => "created",
            ReconcileOutcome::Updated(_) => "updated",
        }
    }
}

/// Build the completed check run payload for a verdict.
pub fn completed_payload(head_sha: &str, verdict: &Verdict) -> CheckRunPayload {
    CheckRunPayload {
        name: CHECK_NAME.to_string(),
        head_sha: head_sha.to_string(),
        status: CheckStatus::Completed,
        conclusion: Some(verdict.conclusion()),
        completed_at: Some(Utc::now()),
        output: check_output(verdict),
    }
}

/// Create or update the check run for `head_sha` to reflect `verdict`.
///
/// A failed lookup aborts before any write. A failed write is returned as
/// is; nothing is retried here.
pub async fn reconcile(
    store: &dyn CheckRunStore,
    repo: &RepoRef,
    head_sha: &str,
    verdict: &Verdict,
) -> Result<ReconcileOutcome> {
    let existing = store
        .find_by_name(repo, head_sha, CHECK_NAME)
        .await
        .map_err(AbrefError::CheckQuery)?;

    let payload = completed_payload(head_sha, verdict);

    match existing {
        Some(record) => {
            debug!(check_run_id = %record.id, "updating existing check run");
            let updated = store
                .update(repo, record.id, &payload)
                .await
                .map_err(AbrefError::CheckWrite)?;
            Ok(ReconcileOutcome::Updated(updated))
        }
        None => {
            debug!("no existing check run, creating");
            let created = store
                .create(repo, &payload)
                .await
                .map_err(AbrefError::CheckWrite)?;
            Ok(ReconcileOutcome::Created(created))
        }
    }
}
