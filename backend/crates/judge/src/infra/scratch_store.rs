//! Scratch Result Store
//!
//! In-memory results of scratch runs. A record is created when a run is
//! accepted, filled in once by the worker, and removed by the first read
//! that sees it finished.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::value_objects::{ScratchRunId, SubmissionStatus};
use crate::error::{JudgeError, JudgeResult};

/// Outcome reported by a worker for a scratch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScratchResult {
    pub status: SubmissionStatus,
    pub stdout: String,
    pub stderr: String,
    /// Seconds, as measured by the worker
    pub runtime: f64,
}

/// What a poll observed
#[derive(Debug, Clone, PartialEq)]
pub enum ScratchPoll {
    Pending,
    /// The record has been removed; a second poll is `NotFound`
    Finished(ScratchResult),
}

#[derive(Debug)]
enum ScratchRecord {
    Pending,
    Finished(ScratchResult),
}

/// Single-lock map from run id to record
#[derive(Debug, Default)]
pub struct ScratchStore {
    records: Mutex<HashMap<ScratchRunId, ScratchRecord>>,
}

impl ScratchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<ScratchRunId, ScratchRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an unfinished run
    pub fn create(&self, id: ScratchRunId) {
        self.records().insert(id, ScratchRecord::Pending);
    }

    /// Read a run, consuming it if finished
    pub fn poll(&self, id: &ScratchRunId) -> JudgeResult<ScratchPoll> {
        let mut records = self.records();

        match records.remove(id) {
            None => Err(JudgeError::ScratchRunNotFound),
            Some(ScratchRecord::Pending) => {
                records.insert(*id, ScratchRecord::Pending);
                Ok(ScratchPoll::Pending)
            }
            Some(ScratchRecord::Finished(result)) => {
                tracing::info!(
                    scratch_run_id = %id,
                    status = %result.status,
                    runtime = result.runtime,
                    "Returning scratch result"
                );
                Ok(ScratchPoll::Finished(result))
            }
        }
    }

    /// Record the worker's result; a finished record is never overwritten
    pub fn complete(&self, id: &ScratchRunId, result: ScratchResult) -> JudgeResult<()> {
        let mut records = self.records();

        let Some(record) = records.get_mut(id) else {
            tracing::warn!(scratch_run_id = %id, "Result for unknown scratch run");
            return Err(JudgeError::ScratchRunNotFound);
        };

        if let ScratchRecord::Finished(_) = record {
            tracing::warn!(scratch_run_id = %id, "Scratch run already has a result");
            return Err(JudgeError::ScratchRunAlreadyCompleted);
        }

        tracing::info!(
            scratch_run_id = %id,
            status = %result.status,
            runtime = result.runtime,
            stdout_length = result.stdout.len(),
            stderr_length = result.stderr.len(),
            "Scratch run finished"
        );
        *record = ScratchRecord::Finished(result);
        Ok(())
    }

    /// Drop a record regardless of its state
    pub fn remove(&self, id: &ScratchRunId) -> bool {
        self.records().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
