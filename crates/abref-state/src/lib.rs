//! abref-state: check-run persistence for abref
//!
//! This crate owns every interaction with the external check-run store.
//! The reconciler in `abref-core` only ever sees the [`CheckRunStore`]
//! trait; production wires in [`GitHubChecksClient`], tests wire in
//! [`fakes::MemoryCheckRunStore`].
//!
//! ## Key Components
//!
//! - `CheckRunStore`: find-by-name / create / update
//! - `CheckRunPayload`, `CheckRunRecord`: what is written and what comes back
//! - `GitHubChecksClient`: REST backend (`reqwest`)

mod error;
pub mod fakes;
pub mod github;
pub mod storage_traits;

pub use error::StorageError;
pub use github::{GitHubChecksClient, GitHubConfig, DEFAULT_API_URL};
pub use storage_traits::{
    CheckConclusion, CheckOutput, CheckRunId, CheckRunPayload, CheckRunRecord, CheckRunStore,
    CheckStatus, RepoRef, StorageResult,
};
