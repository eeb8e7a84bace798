//! abref core library
//!
//! Classifies pull request descriptions for Azure Boards work item
//! references and reconciles the matching GitHub check run.
//!
//! ## Flow
//!
//! `InvocationInput` → (draft skip) → [`classify`] → [`reconcile`] → [`InvocationReport`]

pub mod classifier;
pub mod error;
pub mod event;
pub mod invocation;
pub mod obs;
pub mod reconcile;
pub mod report;
pub mod telemetry;

pub use classifier::{classify, Verdict, WorkItemRef, EXEMPTION_MARKER, REFERENCE_PREFIX};
pub use error::{AbrefError, Result};
pub use event::{load_event, parse_action_bool, parse_event, InvocationInput, PullRequestContext};
pub use invocation::{draft_skip, run_invocation, InvocationOutcome, InvocationReport};
pub use reconcile::{completed_payload, reconcile, ReconcileOutcome, CHECK_NAME};
pub use report::{check_output, missing_reference_message, step_summary};
pub use telemetry::init_tracing;
