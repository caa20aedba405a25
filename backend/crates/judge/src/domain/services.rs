//! Domain Services
//!
//! Pure validation of worker verdicts.

use crate::domain::entities::{Submission, TestCase, Verdict};
use crate::error::{JudgeError, JudgeResult};

/// Check a verdict's shape before it touches storage
///
/// - `PENDING` is never a verdict
/// - a failed test case is present exactly for per-test-case failures
/// - output is only stored alongside a failed test case
pub fn validate_verdict(verdict: &Verdict) -> JudgeResult<()> {
    if !verdict.status.is_terminal() {
        return Err(JudgeError::InvalidVerdict("unsupported status for PATCH"));
    }

    if verdict.failed_test_case_id.is_some() != verdict.status.requires_failed_test_case() {
        return Err(JudgeError::InvalidVerdict(
            "must have a failed test case if and only if the status is a non-compile failure",
        ));
    }

    if verdict.failed_test_case_id.is_none()
        && (!verdict.stdout.is_empty() || !verdict.stderr.is_empty())
    {
        return Err(JudgeError::InvalidVerdict(
            "storing output for non failed test cases is not supported",
        ));
    }

    Ok(())
}

/// The failed test case must exist and belong to the submission's problem
pub fn check_failed_test_case(
    submission: &Submission,
    test_case: Option<&TestCase>,
) -> JudgeResult<()> {
    let test_case = test_case.ok_or(JudgeError::InvalidVerdict("test case does not exist"))?;

    if test_case.problem_id != submission.problem_id {
        return Err(JudgeError::InvalidVerdict(
            "test case is not for this problem",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewSubmission;
    use crate::domain::value_objects::{SubmissionId, SubmissionStatus, UserId};
    use chrono::Utc;
    use uuid::Uuid;

    fn verdict(status: SubmissionStatus, failed: Option<Uuid>, stdout: &str) -> Verdict {
        Verdict {
            status,
            failed_test_case_id: failed,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_valid_verdicts() {
        let case = Some(Uuid::new_v4());
        assert!(validate_verdict(&verdict(SubmissionStatus::Accepted, None, "")).is_ok());
        assert!(validate_verdict(&verdict(SubmissionStatus::CompileTimeError, None, "")).is_ok());
        assert!(validate_verdict(&verdict(SubmissionStatus::WrongAnswer, case, "42")).is_ok());
        assert!(validate_verdict(&verdict(SubmissionStatus::RuntimeError, case, "")).is_ok());
    }

    #[test]
    fn test_pending_rejected() {
        let result = validate_verdict(&verdict(SubmissionStatus::Pending, None, ""));
        assert!(matches!(result, Err(JudgeError::InvalidVerdict(_))));
    }

    #[test]
    fn test_failed_test_case_if_and_only_if_failure() {
        let case = Some(Uuid::new_v4());
        assert!(validate_verdict(&verdict(SubmissionStatus::Accepted, case, "")).is_err());
        assert!(validate_verdict(&verdict(SubmissionStatus::CompileTimeError, case, "")).is_err());
        assert!(validate_verdict(&verdict(SubmissionStatus::TimeLimitExceeded, None, "")).is_err());
        assert!(validate_verdict(&verdict(SubmissionStatus::MemoryLimitExceeded, None, "")).is_err());
    }

    #[test]
    fn test_output_requires_failed_test_case() {
        assert!(validate_verdict(&verdict(SubmissionStatus::Accepted, None, "hello")).is_err());

        let mut with_stderr = verdict(SubmissionStatus::CompileTimeError, None, "");
        with_stderr.stderr = "error: expected `;`".to_string();
        assert!(validate_verdict(&with_stderr).is_err());
    }

    #[test]
    fn test_check_failed_test_case() {
        let submission = NewSubmission {
            user_id: UserId::new(),
            problem_id: 4,
            language_id: Uuid::new_v4(),
            source_code: String::new(),
            event_id: None,
            event_problem_id: None,
        }
        .into_submission(SubmissionId::new(), Utc::now());

        let own = TestCase {
            id: Uuid::new_v4(),
            problem_id: 4,
        };
        let foreign = TestCase {
            id: Uuid::new_v4(),
            problem_id: 5,
        };

        assert!(check_failed_test_case(&submission, Some(&own)).is_ok());
        assert!(check_failed_test_case(&submission, Some(&foreign)).is_err());
        assert!(check_failed_test_case(&submission, None).is_err());
    }
}
