use tracing::info;

use super::GradeService;
use crate::access::{Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry, NotificationEvent};
use crate::grade_math::{RubricCriterion, RubricScore, letter_grade, percentage, round2, rubric_score};
use crate::models::grades::{GradeRecord, GradeResponse, GradeSubmissionRequest};
use crate::services::assignments::assignment_target;

/// 评分
///
/// 分数可以直接给出，也可以由评分细则汇总得出，二者只能选其一。
/// 对已评分的提交再次评分会覆盖原成绩行。
pub async fn grade_submission(
    service: &GradeService,
    actor: &Actor,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> Result<GradeResponse> {
    let ctx = &service.ctx;

    let submission = ctx
        .storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| GradebookError::submission_not_found("提交不存在"))?;

    let assignment = ctx
        .storage
        .get_assignment_by_id(submission.assignment_id)
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    ctx.authorize(
        actor,
        Operation::GradeSubmission,
        assignment_target(&assignment),
        GradebookError::UnauthorizedToGrade,
    )
    .await?;

    let (score, rubric) = match (req.score, req.rubric) {
        (Some(score), None) => (score, None),
        (None, Some(criteria)) => {
            let rubric = score_rubric(&criteria)?;
            (rubric.total_earned, Some(rubric))
        }
        (Some(_), Some(_)) => {
            return Err(GradebookError::validation(
                "score 与 rubric 只能提供其中一个",
            ));
        }
        (None, None) => {
            return Err(GradebookError::validation("缺少 score 或 rubric"));
        }
    };

    if !score.is_finite() || score < 0.0 || score > assignment.max_points {
        return Err(GradebookError::invalid_score_range(format!(
            "分数必须在 0 到 {} 之间",
            assignment.max_points
        )));
    }

    // 等级按存储的两位小数百分比换算，报告中的分布与之一致
    let pct = round2(percentage(score, assignment.max_points));
    let letter = letter_grade(pct).to_string();

    let (grade, regraded) = ctx
        .storage
        .record_grade(GradeRecord {
            submission_id,
            assignment_id: assignment.id,
            student_id: submission.student_id,
            class_id: assignment.class_id,
            score,
            max_score: assignment.max_points,
            percentage: pct,
            letter_grade: letter,
            comments: req.feedback,
            rubric: rubric.as_ref().map(|r| r.breakdown.clone()),
            grader_id: actor.id,
            graded_at: ctx.clock.now(),
        })
        .await?;

    info!(
        grade_id = grade.id,
        submission_id,
        grader_id = actor.id,
        score,
        letter_grade = %grade.letter_grade,
        regraded,
        "提交已评分"
    );

    ctx.events.notify(NotificationEvent::GradeReleased {
        assignment_id: assignment.id,
        student_id: submission.student_id,
        title: assignment.title.clone(),
        letter_grade: grade.letter_grade.clone(),
        percentage: grade.percentage,
    });
    ctx.events.audit(AuditEntry::new(
        AuditAction::SubmissionGrade,
        actor.id,
        serde_json::json!({
            "submission_id": submission_id,
            "grade_id": grade.id,
            "score": score,
            "regraded": regraded,
        }),
    ));

    Ok(GradeResponse {
        grade,
        regraded,
        rubric,
    })
}

fn score_rubric(criteria: &[RubricCriterion]) -> Result<RubricScore> {
    if criteria.is_empty() {
        return Err(GradebookError::validation("评分细则不能为空"));
    }
    for c in criteria {
        if !c.max_points.is_finite() || c.max_points <= 0.0 {
            return Err(GradebookError::validation("评分项满分必须为正数"));
        }
        if c
            .score
            .is_some_and(|s| !s.is_finite() || s < 0.0 || s > c.max_points)
        {
            return Err(GradebookError::invalid_score_range(format!(
                "评分项 {} 的分数超出范围",
                c.name.as_deref().unwrap_or("-")
            )));
        }
    }
    Ok(rubric_score(criteria))
}
