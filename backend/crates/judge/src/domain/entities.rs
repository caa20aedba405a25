//! Domain Entities
//!
//! Graded submissions and the read-only reference data they point at.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{
    EventId, EventProblemId, GENERAL_EVENT_ID, LanguageId, ProblemId, SubmissionId,
    SubmissionStatus, TestCaseId, UserId,
};

/// Graded submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub language_id: LanguageId,
    pub source_code: String,
    pub status: SubmissionStatus,
    pub failed_test_case_id: Option<TestCaseId>,
    pub stdout: String,
    pub stderr: String,
    pub submit_time: DateTime<Utc>,
    pub event_id: Option<EventId>,
    pub event_problem_id: Option<EventProblemId>,
}

/// Submission to be inserted
///
/// Carries no status or failure fields: every new submission starts
/// `PENDING` with empty output.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub language_id: LanguageId,
    pub source_code: String,
    pub event_id: Option<EventId>,
    pub event_problem_id: Option<EventProblemId>,
}

impl NewSubmission {
    pub fn into_submission(self, id: SubmissionId, submit_time: DateTime<Utc>) -> Submission {
        Submission {
            id,
            user_id: self.user_id,
            problem_id: self.problem_id,
            language_id: self.language_id,
            source_code: self.source_code,
            status: SubmissionStatus::Pending,
            failed_test_case_id: None,
            stdout: String::new(),
            stderr: String::new(),
            submit_time,
            event_id: self.event_id,
            event_problem_id: self.event_problem_id,
        }
    }
}

/// Result reported by a worker for a graded submission
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: SubmissionStatus,
    pub failed_test_case_id: Option<TestCaseId>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
    pub extension: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub id: TestCaseId,
    pub problem_id: ProblemId,
}

/// Contest window
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Event {
    pub fn is_general(&self) -> bool {
        self.id == GENERAL_EVENT_ID
    }

    /// Inclusive on both ends
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// A problem as listed in one event
#[derive(Debug, Clone, PartialEq)]
pub struct EventProblem {
    pub id: EventProblemId,
    pub event_id: EventId,
    pub problem_id: ProblemId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(id: EventId, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event {
            id,
            title: "contest".to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_event_window() {
        let now = Utc::now();
        let running = event(7, now - Duration::hours(1), now + Duration::hours(1));
        assert!(running.is_running(now));
        assert!(running.is_running(running.start_time));
        assert!(running.is_running(running.end_time));

        let future = event(7, now + Duration::hours(1), now + Duration::hours(2));
        assert!(!future.is_running(now));

        let past = event(7, now - Duration::hours(2), now - Duration::hours(1));
        assert!(!past.is_running(now));
    }

    #[test]
    fn test_new_submission_starts_pending() {
        let new = NewSubmission {
            user_id: UserId::new(),
            problem_id: 3,
            language_id: uuid::Uuid::new_v4(),
            source_code: "main".to_string(),
            event_id: None,
            event_problem_id: None,
        };
        let submission = new.into_submission(SubmissionId::new(), Utc::now());

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert!(submission.failed_test_case_id.is_none());
        assert!(submission.stdout.is_empty() && submission.stderr.is_empty());
    }
}
