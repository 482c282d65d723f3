use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{letter_grade, percentage, round2};

/// 评分细则中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct RubricCriterion {
    #[serde(default)]
    pub name: Option<String>,
    pub max_points: f64,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CriterionBreakdown {
    pub name: Option<String>,
    pub max_points: f64,
    pub score: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct RubricScore {
    pub total_possible: f64,
    pub total_earned: f64,
    pub percentage: f64,
    pub letter_grade: String,
    pub breakdown: Vec<CriterionBreakdown>,
}

/// 按评分细则汇总，未给分的项按 0 计
pub fn rubric_score(criteria: &[RubricCriterion]) -> RubricScore {
    let total_possible: f64 = criteria.iter().map(|c| c.max_points).sum();
    let total_earned: f64 = criteria.iter().map(|c| c.score.unwrap_or(0.0)).sum();
    let pct = percentage(total_earned, total_possible);

    let breakdown = criteria
        .iter()
        .map(|c| {
            let score = c.score.unwrap_or(0.0);
            CriterionBreakdown {
                name: c.name.clone(),
                max_points: c.max_points,
                score,
                percentage: round2(percentage(score, c.max_points)),
            }
        })
        .collect();

    RubricScore {
        total_possible,
        total_earned,
        percentage: round2(pct),
        letter_grade: letter_grade(pct).to_string(),
        breakdown,
    }
}
