use tracing::debug;

use super::ReportService;
use super::reconcile::reconcile;
use crate::access::{Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::models::reports::SubmissionReport;
use crate::models::submissions::SubmissionStatus;
use crate::services::assignments::assignment_target;

/// 作业提交对账报告
///
/// 先读提交再读在读学生名单，两次读取之间不要求快照一致。
pub async fn get_submissions_report(
    service: &ReportService,
    actor: &Actor,
    assignment_id: i64,
    status: Option<SubmissionStatus>,
) -> Result<SubmissionReport> {
    let ctx = &service.ctx;

    let assignment = ctx
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    ctx.authorize(
        actor,
        Operation::ViewReport,
        assignment_target(&assignment),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    let records = ctx.storage.list_submission_records(assignment_id).await?;
    let enrolled = ctx.storage.list_active_students(assignment.class_id).await?;

    let report = reconcile(&assignment, records, &enrolled, ctx.clock.now(), status);

    debug!(
        assignment_id,
        enrolled = report.statistics.total_enrolled,
        submitted = report.statistics.total_submitted,
        missing = report.statistics.total_missing,
        "对账报告已生成"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::GradeSubmissionRequest;
    use crate::models::submissions::SubmissionContent;
    use crate::services::{GradeService, SubmissionService};
    use crate::test_support::Scenario;

    #[tokio::test]
    async fn test_report_end_to_end() {
        let s = Scenario::new(10).await;
        let assignment = s.assignment(24, 20.0).await;
        let submissions = SubmissionService::new(s.ctx.clone());
        let grades = GradeService::new(s.ctx.clone(), Default::default());

        let mut submission_ids = Vec::new();
        for student in &s.students[..6] {
            let resp = submissions
                .submit_assignment(student, assignment.id, SubmissionContent::default())
                .await
                .unwrap();
            submission_ids.push(resp.submission.id);
        }
        for (id, score) in submission_ids.iter().take(2).zip([18.0, 14.0]) {
            grades
                .grade_submission(
                    &s.owner,
                    *id,
                    GradeSubmissionRequest {
                        score: Some(score),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        s.clock.advance(chrono::Duration::hours(30));
        let service = ReportService::new(s.ctx.clone());
        let report = service
            .get_submissions_report(&s.owner, assignment.id, None)
            .await
            .unwrap();

        let stats = &report.statistics;
        assert_eq!(stats.total_enrolled, 10);
        assert_eq!(stats.total_submitted, 6);
        assert_eq!(stats.total_missing, 4);
        assert_eq!(stats.total_graded, 2);
        assert_eq!(stats.pending_grading, 4);
        assert_eq!(stats.submission_rate, 60);
        assert_eq!(stats.grading_rate, 33);
        assert_eq!(stats.on_time_submissions, 6);

        assert!(report.missing.iter().all(|m| m.is_late));
        assert!(report.missing.iter().all(|m| m.hours_past_due == 6.0));

        let grade_stats = report.grade_statistics.unwrap();
        assert_eq!(grade_stats.count, 2);
        assert_eq!(grade_stats.mean, 80.0);

        let graded_row = report
            .submissions
            .iter()
            .find(|r| r.submission_id == submission_ids[0])
            .unwrap();
        let view = graded_row.grade.as_ref().unwrap();
        assert_eq!(view.grader_name.as_deref(), Some("owner display"));
    }

    #[tokio::test]
    async fn test_report_access_and_lookup_order() {
        let s = Scenario::new(1).await;
        let assignment = s.assignment(24, 20.0).await;
        let service = ReportService::new(s.ctx.clone());

        let err = service
            .get_submissions_report(&s.other_teacher, 77_777, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentNotFound(_)));

        for actor in [s.other_teacher, s.students[0]] {
            let err = service
                .get_submissions_report(&actor, assignment.id, None)
                .await
                .unwrap_err();
            assert!(matches!(err, GradebookError::UnauthorizedClassAccess(_)));
        }

        let report = service
            .get_submissions_report(&s.admin, assignment.id, None)
            .await
            .unwrap();
        assert!(report.grade_statistics.is_none());
        assert!(report.grade_distribution.is_none());
        assert_eq!(report.statistics.total_missing, 1);
    }
}
