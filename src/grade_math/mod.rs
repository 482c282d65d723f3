//! 成绩计算
//!
//! 纯函数集合：百分比、等级映射、绩点、加权成绩、评分细则、描述统计与等级分布。
//! 不访问存储，也不读取时间。

mod rubric;
mod scale;
mod stats;

pub use rubric::{CriterionBreakdown, RubricCriterion, RubricScore, rubric_score};
pub use scale::{DEFAULT_SCALE, gpa_points, letter_grade, letter_grade_with};
pub use stats::{
    DescriptiveStats, DistributionBucket, WeightedItem, descriptive_stats, grade_distribution,
    weighted_grade,
};

/// 计算百分比，`total` 为 0 时返回 0，不做范围截断
pub fn percentage(points: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    points / total * 100.0
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
