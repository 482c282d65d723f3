use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grade_math::CriterionBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub assignment_id: i64,
    pub submission_id: i64,
    pub score: f64,
    pub max_score: f64,
    /// 两位小数
    pub percentage: f64,
    pub letter_grade: String,
    pub comments: Option<String>,
    /// 按评分细则打分时的明细
    pub rubric: Option<Vec<CriterionBreakdown>>,
    pub grader_id: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

/// 评分事务写入的数据
#[derive(Debug, Clone)]
pub struct GradeRecord {
    pub submission_id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub letter_grade: String,
    pub comments: Option<String>,
    pub rubric: Option<Vec<CriterionBreakdown>>,
    pub grader_id: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

/// 学生成绩及其作业类型，用于计算加权总评
#[derive(Debug, Clone)]
pub struct StudentGradeItem {
    pub grade: Grade,
    pub assignment_title: String,
    pub assignment_type: crate::models::assignments::AssignmentType,
}
