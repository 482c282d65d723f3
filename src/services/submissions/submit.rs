use tracing::info;

use super::SubmissionService;
use crate::access::{AccessTarget, Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry};
use crate::models::assignments::AssignmentStatus;
use crate::models::submissions::{SubmissionContent, SubmitResponse};
use crate::utils::validate::validate_attachments;

/// 提交作业
///
/// 同一学生对同一作业只保留一份提交，截止前再次提交会覆盖内容与提交时间。
/// 是否迟交不在这里记录，而是在报告中按截止时间实时计算。
pub async fn submit_assignment(
    service: &SubmissionService,
    actor: &Actor,
    assignment_id: i64,
    content: SubmissionContent,
) -> Result<SubmitResponse> {
    let ctx = &service.ctx;

    validate_attachments(&content.attachments).map_err(GradebookError::validation)?;

    let assignment = ctx
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .filter(|a| a.status == AssignmentStatus::Active)
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    let now = ctx.clock.now();
    if now > assignment.due_date {
        return Err(GradebookError::assignment_deadline_passed(
            "已超过作业截止时间",
        ));
    }

    ctx.authorize(
        actor,
        Operation::SubmitAssignment,
        AccessTarget::Class(assignment.class_id),
        GradebookError::StudentNotEnrolled,
    )
    .await?;

    let attachment_count = content.attachments.len();
    let (submission, resubmitted) = ctx
        .storage
        .upsert_submission(assignment_id, actor.id, content, now)
        .await?;

    info!(
        submission_id = submission.id,
        assignment_id,
        student_id = actor.id,
        resubmitted,
        "作业已提交"
    );

    ctx.events.audit(AuditEntry::new(
        AuditAction::SubmissionSubmit,
        actor.id,
        serde_json::json!({
            "submission_id": submission.id,
            "assignment_id": assignment_id,
            "resubmitted": resubmitted,
            "attachments": attachment_count,
        }),
    ));

    Ok(SubmitResponse {
        submission,
        resubmitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::GradeRecord;
    use crate::models::submissions::SubmissionStatus;
    use crate::test_support::Scenario;

    fn content(text: &str) -> SubmissionContent {
        SubmissionContent {
            submission_text: Some(text.to_string()),
            attachments: vec!["uploads/answer.pdf".to_string()],
        }
    }

    #[tokio::test]
    async fn test_submit_then_resubmit_keeps_one_row() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(24, 10.0).await;
        let student = &s.students[0];

        let first = service
            .submit_assignment(student, assignment.id, content("draft"))
            .await
            .unwrap();
        assert!(!first.resubmitted);
        assert_eq!(first.submission.status, SubmissionStatus::Submitted);

        s.clock.advance(chrono::Duration::hours(1));
        let second = service
            .submit_assignment(student, assignment.id, content("final"))
            .await
            .unwrap();
        assert!(second.resubmitted);
        assert_eq!(second.submission.id, first.submission.id);
        assert_eq!(second.submission.submission_text.as_deref(), Some("final"));
        assert_eq!(second.submission.submitted_at, s.now());

        let records = s
            .ctx
            .storage
            .list_submission_records(assignment.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);

        s.ctx.events.flush().await;
        assert_eq!(
            s.audit.actions(),
            vec![AuditAction::SubmissionSubmit, AuditAction::SubmissionSubmit]
        );
    }

    #[tokio::test]
    async fn test_submit_deadline_is_inclusive() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(2, 10.0).await;
        let student = &s.students[0];

        s.clock.set(assignment.due_date);
        assert!(
            service
                .submit_assignment(student, assignment.id, content("on time"))
                .await
                .is_ok()
        );

        s.clock.advance(chrono::Duration::seconds(1));
        let err = service
            .submit_assignment(student, assignment.id, content("late"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentDeadlinePassed(_)));
    }

    #[tokio::test]
    async fn test_submit_after_deadline_fails_even_for_outsider() {
        let s = Scenario::new(0).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(1, 10.0).await;
        s.clock.advance(chrono::Duration::hours(3));

        let err = service
            .submit_assignment(&s.outsider, assignment.id, content("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentDeadlinePassed(_)));
    }

    #[tokio::test]
    async fn test_submit_requires_active_enrollment() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(24, 10.0).await;

        let err = service
            .submit_assignment(&s.outsider, assignment.id, content("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::StudentNotEnrolled(_)));

        let err = service
            .submit_assignment(&s.owner, assignment.id, content("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::StudentNotEnrolled(_)));
    }

    #[tokio::test]
    async fn test_submit_unknown_or_inactive_assignment() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let student = &s.students[0];

        let err = service
            .submit_assignment(student, 12_345, content("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentNotFound(_)));

        let assignment = s.assignment(24, 10.0).await;
        service
            .submit_assignment(student, assignment.id, content("x"))
            .await
            .unwrap();
        s.ctx
            .storage
            .delete_assignment(assignment.id, s.now())
            .await
            .unwrap();

        let err = service
            .submit_assignment(student, assignment.id, content("again"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentNotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_attachment() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(24, 10.0).await;

        let err = service
            .submit_assignment(
                &s.students[0],
                assignment.id,
                SubmissionContent {
                    submission_text: None,
                    attachments: vec!["../../etc/passwd; rm".to_string()],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resubmit_after_grading_is_rejected() {
        let s = Scenario::new(1).await;
        let service = SubmissionService::new(s.ctx.clone());
        let assignment = s.assignment(24, 10.0).await;
        let student = &s.students[0];

        let submitted = service
            .submit_assignment(student, assignment.id, content("v1"))
            .await
            .unwrap();
        s.ctx
            .storage
            .record_grade(GradeRecord {
                submission_id: submitted.submission.id,
                assignment_id: assignment.id,
                student_id: student.id,
                class_id: s.class_id,
                score: 8.0,
                max_score: 10.0,
                percentage: 80.0,
                letter_grade: "B-".to_string(),
                comments: None,
                rubric: None,
                grader_id: s.owner.id,
                graded_at: s.now(),
            })
            .await
            .unwrap();

        let err = service
            .submit_assignment(student, assignment.id, content("v2"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::SubmissionAlreadyGraded(_)));

        let kept = s
            .ctx
            .storage
            .get_submission_by_id(submitted.submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.status, SubmissionStatus::Graded);
        assert_eq!(kept.submission_text.as_deref(), Some("v1"));
    }
}
