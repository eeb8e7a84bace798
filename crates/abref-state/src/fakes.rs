//! In-memory fake for `CheckRunStore` (testing only)
//!
//! `MemoryCheckRunStore` satisfies the trait contract without any network
//! access, records every call in order so tests can assert that a lookup
//! always precedes a write, and can be told to fail queries or writes.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage_traits::*;

/// One call observed by the fake, in the order it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Find { head_sha: String, name: String },
    Create { head_sha: String, name: String },
    Update { id: CheckRunId },
}

impl StoreCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreCall::Find { .. })
    }
}

#[derive(Debug, Default)]
struct StoreState {
    runs: Vec<(RepoRef, CheckRunRecord)>,
    calls: Vec<StoreCall>,
    next_id: u64,
    fail_queries: bool,
    fail_writes: bool,
}

/// In-memory check-run store backed by a `Vec<(repo, record)>`.
#[derive(Debug, Default)]
pub struct MemoryCheckRunStore {
    state: Mutex<StoreState>,
}

impl MemoryCheckRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `find_by_name` fail with a transport error.
    pub fn with_query_failure(self) -> Self {
        self.state.lock().unwrap().fail_queries = true;
        self
    }

    /// Make every `create`/`update` fail with an API error.
    pub fn with_write_failure(self) -> Self {
        self.state.lock().unwrap().fail_writes = true;
        self
    }

    /// Seed a pre-existing check run, as if left by an earlier invocation.
    pub fn seed(&self, repo: &RepoRef, payload: &CheckRunPayload) -> CheckRunRecord {
        let mut state = self.state.lock().unwrap();
        insert(&mut state, repo, payload)
    }

    /// All check runs currently stored for a repository.
    pub fn runs(&self, repo: &RepoRef) -> Vec<CheckRunRecord> {
        let state = self.state.lock().unwrap();
        state
            .runs
            .iter()
            .filter(|(r, _)| r == repo)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn insert(state: &mut StoreState, repo: &RepoRef, payload: &CheckRunPayload) -> CheckRunRecord {
    state.next_id += 1;
    let record = CheckRunRecord {
        id: CheckRunId(state.next_id),
        name: payload.name.clone(),
        head_sha: payload.head_sha.clone(),
        status: payload.status,
        conclusion: payload.conclusion,
        output: payload.output.clone(),
    };
    state.runs.push((repo.clone(), record.clone()));
    record
}

#[async_trait]
impl CheckRunStore for MemoryCheckRunStore {
    async fn find_by_name(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        name: &str,
    ) -> StorageResult<Option<CheckRunRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Find {
            head_sha: head_sha.to_string(),
            name: name.to_string(),
        });
        if state.fail_queries {
            return Err(StorageError::Transport("injected query failure".to_string()));
        }
        Ok(state
            .runs
            .iter()
            .find(|(r, record)| r == repo && record.head_sha == head_sha && record.name == name)
            .map(|(_, record)| record.clone()))
    }

    async fn create(
        &self,
        repo: &RepoRef,
        payload: &CheckRunPayload,
    ) -> StorageResult<CheckRunRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create {
            head_sha: payload.head_sha.clone(),
            name: payload.name.clone(),
        });
        if state.fail_writes {
            return Err(StorageError::Api {
                status: 500,
                message: "injected write failure".to_string(),
            });
        }
        Ok(insert(&mut state, repo, payload))
    }

    async fn update(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        payload: &CheckRunPayload,
    ) -> StorageResult<CheckRunRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Update { id });
        if state.fail_writes {
            return Err(StorageError::Api {
                status: 500,
                message: "injected write failure".to_string(),
            });
        }
        let (_, record) = state
            .runs
            .iter_mut()
            .find(|(r, record)| r == repo && record.id == id)
            .ok_or(StorageError::NotFound { id: id.0 })?;
        record.name = payload.name.clone();
        record.status = payload.status;
        record.conclusion = payload.conclusion;
        record.output = payload.output.clone();
        Ok(record.clone())
    }
}
