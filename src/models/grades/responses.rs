use serde::Serialize;
use ts_rs::TS;

use super::entities::Grade;
use crate::grade_math::RubricScore;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeResponse {
    pub grade: Grade,
    /// 是否覆盖了已有成绩
    pub regraded: bool,
    pub rubric: Option<RubricScore>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SummaryItem {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub assignment_type: crate::models::assignments::AssignmentType,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub weight: f64,
}

// 学生在某班级的加权总评
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentSummary {
    pub student_id: i64,
    pub class_id: i64,
    pub items: Vec<SummaryItem>,
    pub weighted_percentage: f64,
    pub letter_grade: String,
    pub gpa_points: f64,
}
