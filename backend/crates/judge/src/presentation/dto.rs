//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{CreateScratchInput, CreateSubmissionInput, VerdictInput};
use crate::domain::entities::Submission;
use crate::domain::value_objects::{
    EventId, EventProblemId, LanguageId, ProblemId, SubmissionId, SubmissionStatus,
    TestCaseId, UserId,
};
use crate::infra::scratch_store::{ScratchPoll, ScratchResult};

// ============================================================================
// Submissions
// ============================================================================

/// Create submission request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub problem_id: ProblemId,
    pub language_id: LanguageId,
    pub source_code: String,
    /// Only for contest submissions
    #[serde(default)]
    pub event_id: Option<EventId>,
}

impl From<CreateSubmissionRequest> for CreateSubmissionInput {
    fn from(req: CreateSubmissionRequest) -> Self {
        Self {
            user_id: req.user_id,
            problem_id: req.problem_id,
            language_id: req.language_id,
            source_code: req.source_code,
            event_id: req.event_id,
        }
    }
}

/// Created submission response
#[derive(Debug, Clone, Serialize)]
pub struct CreatedSubmissionResponse {
    pub id: SubmissionId,
    pub status: SubmissionStatus,
    pub submit_time: DateTime<Utc>,
}

impl From<&Submission> for CreatedSubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            status: submission.status,
            submit_time: submission.submit_time,
        }
    }
}

/// Full submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub language_id: LanguageId,
    pub source_code: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_test_case_id: Option<TestCaseId>,
    pub stdout: String,
    pub stderr: String,
    pub submit_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_problem_id: Option<EventProblemId>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            language_id: s.language_id,
            source_code: s.source_code,
            status: s.status,
            failed_test_case_id: s.failed_test_case_id,
            stdout: s.stdout,
            stderr: s.stderr,
            submit_time: s.submit_time,
            event_id: s.event_id,
            event_problem_id: s.event_problem_id,
        }
    }
}

/// Submission status response
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusResponse {
    pub id: SubmissionId,
    pub status: SubmissionStatus,
}

/// Verdict reported by a worker
#[derive(Debug, Clone, Deserialize)]
pub struct VerdictRequest {
    /// Parsed by the use case, after the submission lookup
    pub status: String,
    #[serde(default)]
    pub failed_test_case_id: Option<TestCaseId>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl From<VerdictRequest> for VerdictInput {
    fn from(req: VerdictRequest) -> Self {
        Self {
            status: req.status,
            failed_test_case_id: req.failed_test_case_id,
            stdout: req.stdout,
            stderr: req.stderr,
        }
    }
}

// ============================================================================
// Scratch Runs
// ============================================================================

/// Create scratch run request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScratchRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub source_code: String,
    pub language_id: LanguageId,
    #[serde(default)]
    pub stdin: String,
}

impl From<CreateScratchRequest> for CreateScratchInput {
    fn from(req: CreateScratchRequest) -> Self {
        Self {
            user_id: req.user_id,
            source_code: req.source_code,
            language_id: req.language_id,
            stdin: req.stdin,
        }
    }
}

/// Scratch result reported by a worker
#[derive(Debug, Clone, Deserialize)]
pub struct ScratchResultRequest {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub runtime: f64,
}

impl From<ScratchResultRequest> for ScratchResult {
    fn from(req: ScratchResultRequest) -> Self {
        Self {
            status: req.status,
            stdout: req.stdout,
            stderr: req.stderr,
            runtime: req.runtime,
        }
    }
}

/// Poll response: `{"status":"PENDING"}` or the finished result
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScratchPollResponse {
    Pending {
        status: SubmissionStatus,
    },
    Finished {
        status: SubmissionStatus,
        stdout: String,
        stderr: String,
        finished: bool,
        runtime: f64,
    },
}

impl From<ScratchPoll> for ScratchPollResponse {
    fn from(poll: ScratchPoll) -> Self {
        match poll {
            ScratchPoll::Pending => Self::Pending {
                status: SubmissionStatus::Pending,
            },
            ScratchPoll::Finished(result) => Self::Finished {
                status: result.status,
                stdout: result.stdout,
                stderr: result.stderr,
                finished: true,
                runtime: result.runtime,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_poll_pending_shape() {
        let json = serde_json::to_value(ScratchPollResponse::from(ScratchPoll::Pending)).unwrap();
        assert_eq!(json, json!({ "status": "PENDING" }));
    }

    #[test]
    fn test_poll_finished_shape() {
        let poll = ScratchPoll::Finished(ScratchResult {
            status: SubmissionStatus::Accepted,
            stdout: "4\n".to_string(),
            stderr: String::new(),
            runtime: 0.25,
        });
        let json = serde_json::to_value(ScratchPollResponse::from(poll)).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "ACCEPTED",
                "stdout": "4\n",
                "stderr": "",
                "finished": true,
                "runtime": 0.25,
            })
        );
    }

    #[test]
    fn test_verdict_request_defaults() {
        let req: VerdictRequest =
            serde_json::from_value(json!({ "status": "COMPILE_TIME_ERROR" })).unwrap();
        let input = VerdictInput::from(req);
        assert_eq!(input.status, "COMPILE_TIME_ERROR");
        assert!(input.failed_test_case_id.is_none());
        assert!(input.stdout.is_empty());
    }

    #[test]
    fn test_unknown_status_left_to_use_case() {
        let req: VerdictRequest = serde_json::from_value(json!({ "status": "SKIPPED" })).unwrap();
        assert_eq!(req.status, "SKIPPED");

        let result = serde_json::from_value::<VerdictRequest>(json!({ "status": 3 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_response_omits_absent_fields() {
        let submission = crate::domain::entities::NewSubmission {
            user_id: UserId::new(),
            problem_id: 2,
            language_id: uuid::Uuid::new_v4(),
            source_code: "print(1)".to_string(),
            event_id: None,
            event_problem_id: None,
        }
        .into_submission(SubmissionId::new(), Utc::now());

        let json = serde_json::to_value(SubmissionResponse::from(submission)).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("failed_test_case_id").is_none());
        assert!(json.get("event_id").is_none());
    }
}
