use super::GradeService;
use crate::access::{AccessTarget, Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::grade_math::{WeightedItem, gpa_points, letter_grade, round2, weighted_grade};
use crate::models::grades::{StudentSummary, SummaryItem};

/// 学生在某班级的加权总评，权重按作业类型取自评分配置
pub async fn student_summary(
    service: &GradeService,
    actor: &Actor,
    class_id: i64,
    student_id: i64,
) -> Result<StudentSummary> {
    let ctx = &service.ctx;

    if ctx.storage.get_class_by_id(class_id).await?.is_none() {
        return Err(GradebookError::not_found("班级不存在"));
    }

    ctx.authorize(
        actor,
        Operation::ViewStudentSummary,
        AccessTarget::Student {
            class_id,
            student_id,
        },
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    let grades = ctx.storage.list_student_grades(class_id, student_id).await?;

    let items: Vec<SummaryItem> = grades
        .into_iter()
        .map(|item| SummaryItem {
            assignment_id: item.grade.assignment_id,
            assignment_title: item.assignment_title,
            assignment_type: item.assignment_type,
            score: item.grade.score,
            max_score: item.grade.max_score,
            percentage: item.grade.percentage,
            weight: service.grading.weight_for(item.assignment_type.as_str()),
        })
        .collect();

    let weighted: Vec<WeightedItem> = items
        .iter()
        .map(|i| WeightedItem::new(i.score, i.max_score).with_weight(i.weight))
        .collect();
    let overall = round2(weighted_grade(&weighted));
    let letter = letter_grade(overall);

    Ok(StudentSummary {
        student_id,
        class_id,
        items,
        weighted_percentage: overall,
        letter_grade: letter.to_string(),
        gpa_points: gpa_points(letter),
    })
}
