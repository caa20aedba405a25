//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Event, EventProblem, Language, NewSubmission, Problem, Submission, TestCase, Verdict,
};
use crate::domain::repository::{CatalogRepository, SubmissionRepository};
use crate::domain::value_objects::{
    EventId, LanguageId, ProblemId, SubmissionId, SubmissionStatus, TestCaseId, UserId,
};
use crate::error::{JudgeError, JudgeResult};

/// PostgreSQL-backed judge repository
#[derive(Clone)]
pub struct PgJudgeRepository {
    pool: PgPool,
}

impl PgJudgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUBMISSION_COLUMNS: &str = r#"
    id, user_id, problem_id, language_id, source_code, status,
    failed_test_case_id, stdout, stderr, submit_time, event_id, event_problem_id
"#;

// ============================================================================
// Submission Repository Implementation
// ============================================================================

impl SubmissionRepository for PgJudgeRepository {
    async fn create(&self, submission: &NewSubmission) -> JudgeResult<Submission> {
        let id = SubmissionId::new();
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions (
                id, user_id, problem_id, language_id, source_code, status,
                stdout, stderr, submit_time, event_id, event_problem_id
            ) VALUES ($1, $2, $3, $4, $5, $6, '', '', $7, $8, $9)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(submission.user_id.as_uuid())
        .bind(submission.problem_id)
        .bind(submission.language_id)
        .bind(&submission.source_code)
        .bind(SubmissionStatus::Pending.as_str())
        .bind(Utc::now())
        .bind(submission.event_id)
        .bind(submission.event_problem_id)
        .fetch_one(&self.pool)
        .await?;

        row.into_submission()
    }

    async fn find_by_id(&self, id: &SubmissionId) -> JudgeResult<Option<Submission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        problem_id: Option<ProblemId>,
        limit: i64,
    ) -> JudgeResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR problem_id = $2)
            ORDER BY submit_time DESC
            LIMIT $3
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(problem_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    async fn list_for_event(
        &self,
        event_id: EventId,
        user_id: Option<&UserId>,
        limit: i64,
    ) -> JudgeResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions
            WHERE event_id = $1 AND ($2::UUID IS NULL OR user_id = $2)
            ORDER BY submit_time DESC
            LIMIT $3
            "#
        ))
        .bind(event_id)
        .bind(user_id.map(|id| *id.as_uuid()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    async fn complete(&self, id: &SubmissionId, verdict: &Verdict) -> JudgeResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE submissions
            SET status = $2, failed_test_case_id = $3, stdout = $4, stderr = $5
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(id.as_uuid())
        .bind(verdict.status.as_str())
        .bind(verdict.failed_test_case_id)
        .bind(&verdict.stdout)
        .bind(&verdict.stderr)
        .bind(SubmissionStatus::Pending.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Catalog Repository Implementation
// ============================================================================

impl CatalogRepository for PgJudgeRepository {
    async fn find_problem(&self, id: ProblemId) -> JudgeResult<Option<Problem>> {
        let row = sqlx::query_as::<_, ProblemRow>(
            "SELECT id, title FROM problem_descriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Problem {
            id: r.id,
            title: r.title,
        }))
    }

    async fn find_language(&self, id: &LanguageId) -> JudgeResult<Option<Language>> {
        let row = sqlx::query_as::<_, LanguageRow>(
            "SELECT id, name, extension, version FROM languages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Language {
            id: r.id,
            name: r.name,
            extension: r.extension,
            version: r.version,
        }))
    }

    async fn find_test_case(&self, id: &TestCaseId) -> JudgeResult<Option<TestCase>> {
        let row = sqlx::query_as::<_, TestCaseRow>(
            "SELECT id, problem_id FROM test_cases WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| TestCase {
            id: r.id,
            problem_id: r.problem_id,
        }))
    }

    async fn find_event(&self, id: EventId) -> JudgeResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, title, start_time, end_time FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Event {
            id: r.id,
            title: r.title,
            start_time: r.start_time,
            end_time: r.end_time,
        }))
    }

    async fn find_event_problem(
        &self,
        event_id: EventId,
        problem_id: ProblemId,
    ) -> JudgeResult<Option<EventProblem>> {
        let row = sqlx::query_as::<_, EventProblemRow>(
            "SELECT id, event_id, problem_id FROM event_problems WHERE event_id = $1 AND problem_id = $2",
        )
        .bind(event_id)
        .bind(problem_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| EventProblem {
            id: r.id,
            event_id: r.event_id,
            problem_id: r.problem_id,
        }))
    }

    async fn is_participant(&self, user_id: &UserId, event_id: EventId) -> JudgeResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM event_users WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(user_id.as_uuid())
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn user_exists(&self, user_id: &UserId) -> JudgeResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    user_id: Uuid,
    problem_id: i64,
    language_id: Uuid,
    source_code: String,
    status: String,
    failed_test_case_id: Option<Uuid>,
    stdout: String,
    stderr: String,
    submit_time: DateTime<Utc>,
    event_id: Option<i64>,
    event_problem_id: Option<i64>,
}

impl SubmissionRow {
    fn into_submission(self) -> JudgeResult<Submission> {
        let status = self
            .status
            .parse::<SubmissionStatus>()
            .map_err(|e| JudgeError::Internal(e.to_string()))?;

        Ok(Submission {
            id: SubmissionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            problem_id: self.problem_id,
            language_id: self.language_id,
            source_code: self.source_code,
            status,
            failed_test_case_id: self.failed_test_case_id,
            stdout: self.stdout,
            stderr: self.stderr,
            submit_time: self.submit_time,
            event_id: self.event_id,
            event_problem_id: self.event_problem_id,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProblemRow {
    id: i64,
    title: String,
}

#[derive(sqlx::FromRow)]
struct LanguageRow {
    id: Uuid,
    name: String,
    extension: String,
    version: String,
}

#[derive(sqlx::FromRow)]
struct TestCaseRow {
    id: Uuid,
    problem_id: i64,
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct EventProblemRow {
    id: i64,
    event_id: i64,
    problem_id: i64,
}
