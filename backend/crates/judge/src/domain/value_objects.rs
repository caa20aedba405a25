//! Value Objects
//!
//! Verdicts, reference ids and the job descriptors placed on the queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use kernel::id::{ScratchRunId, SubmissionId, UserId};

pub type ProblemId = i64;
pub type EventId = i64;
pub type EventProblemId = i64;
pub type LanguageId = Uuid;
pub type TestCaseId = Uuid;

/// The always-open event every user may submit to
pub const GENERAL_EVENT_ID: EventId = 1;

// ============================================================================
// Submission Status
// ============================================================================

/// Lifecycle of a graded submission
///
/// `Pending` is the only initial state; every other state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompileTimeError,
}

impl SubmissionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Accepted => "ACCEPTED",
            SubmissionStatus::WrongAnswer => "WRONG_ANSWER",
            SubmissionStatus::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            SubmissionStatus::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            SubmissionStatus::RuntimeError => "RUNTIME_ERROR",
            SubmissionStatus::CompileTimeError => "COMPILE_TIME_ERROR",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    /// Failures tied to one test case; these and only these carry
    /// `failed_test_case_id`
    pub const fn requires_failed_test_case(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::WrongAnswer
                | SubmissionStatus::TimeLimitExceeded
                | SubmissionStatus::MemoryLimitExceeded
                | SubmissionStatus::RuntimeError
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown submission status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for SubmissionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "PENDING" => SubmissionStatus::Pending,
            "ACCEPTED" => SubmissionStatus::Accepted,
            "WRONG_ANSWER" => SubmissionStatus::WrongAnswer,
            "TIME_LIMIT_EXCEEDED" => SubmissionStatus::TimeLimitExceeded,
            "MEMORY_LIMIT_EXCEEDED" => SubmissionStatus::MemoryLimitExceeded,
            "RUNTIME_ERROR" => SubmissionStatus::RuntimeError,
            "COMPILE_TIME_ERROR" => SubmissionStatus::CompileTimeError,
            other => return Err(UnknownStatus(other.to_string())),
        };
        Ok(status)
    }
}

// ============================================================================
// Job Descriptors
// ============================================================================

/// Message placed on the submission queue for the execution fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobDescriptor {
    /// Grade a stored submission against its problem's test cases
    Submission { id: SubmissionId },
    /// Run code once against caller-supplied stdin
    Input {
        id: ScratchRunId,
        code: String,
        language_id: LanguageId,
        stdin: String,
    },
}

impl JobDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            JobDescriptor::Submission { .. } => "submission",
            JobDescriptor::Input { .. } => "input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL: [SubmissionStatus; 7] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Accepted,
        SubmissionStatus::WrongAnswer,
        SubmissionStatus::TimeLimitExceeded,
        SubmissionStatus::MemoryLimitExceeded,
        SubmissionStatus::RuntimeError,
        SubmissionStatus::CompileTimeError,
    ];

    #[test]
    fn test_status_wire_form_matches_as_str() {
        for status in ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, json!(status.as_str()));
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
        assert!("pending".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_only_pending_is_initial() {
        let initial: Vec<_> = ALL.iter().filter(|s| !s.is_terminal()).collect();
        assert_eq!(initial, vec![&SubmissionStatus::Pending]);
    }

    #[test]
    fn test_statuses_with_failed_test_case() {
        assert!(SubmissionStatus::WrongAnswer.requires_failed_test_case());
        assert!(SubmissionStatus::RuntimeError.requires_failed_test_case());
        assert!(!SubmissionStatus::Accepted.requires_failed_test_case());
        assert!(!SubmissionStatus::CompileTimeError.requires_failed_test_case());
        assert!(!SubmissionStatus::Pending.requires_failed_test_case());
    }

    #[test]
    fn test_job_descriptor_wire_format() {
        let id = SubmissionId::new();
        let job = JobDescriptor::Submission { id };
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({ "type": "submission", "id": id.to_string() })
        );

        let run = ScratchRunId::new();
        let language = Uuid::new_v4();
        let job = JobDescriptor::Input {
            id: run,
            code: "print(1)".to_string(),
            language_id: language,
            stdin: "".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({
                "type": "input",
                "id": run.to_string(),
                "code": "print(1)",
                "language_id": language.to_string(),
                "stdin": "",
            })
        );
        assert_eq!(job.kind(), "input");
    }
}
