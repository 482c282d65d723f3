use serde::Deserialize;
use ts_rs::TS;

use crate::grade_math::RubricCriterion;

// 评分请求：score 与 rubric 二选一
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSubmissionRequest {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub rubric: Option<Vec<RubricCriterion>>,
    #[serde(default)]
    pub feedback: Option<String>,
}
