use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{DEFAULT_SCALE, letter_grade, percentage, round2};

/// 加权成绩的一项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedItem {
    pub points: f64,
    pub total: f64,
    pub weight: f64,
}

impl WeightedItem {
    /// 权重默认为 1
    pub fn new(points: f64, total: f64) -> Self {
        Self {
            points,
            total,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Σ(百分比 × 权重) / Σ(权重)，空列表或总权重为 0 时返回 0
pub fn weighted_grade(items: &[WeightedItem]) -> f64 {
    let total_weight: f64 = items.iter().map(|i| i.weight).sum();
    if items.is_empty() || total_weight == 0.0 {
        return 0.0;
    }
    let weighted: f64 = items
        .iter()
        .map(|i| percentage(i.points, i.total) * i.weight)
        .sum();
    weighted / total_weight
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    /// 总体标准差（除以 N）
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// 描述统计，空输入返回全零
pub fn descriptive_stats(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats::default();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };

    DescriptiveStats {
        count: values.len(),
        mean: round2(mean),
        median: round2(median),
        mode: round2(mode(values)),
        std_dev: round2(variance.sqrt()),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

// 频次最高者；并列时取输入中最先出现的值
fn mode(values: &[f64]) -> f64 {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, c)) => *c += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best = counts[0];
    for &(v, c) in &counts[1..] {
        if c > best.1 {
            best = (v, c);
        }
    }
    best.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct DistributionBucket {
    pub letter: String,
    pub count: usize,
    /// 占总数的百分比（两位小数）
    pub percentage: f64,
}

/// 等级分布，标准等级表中的每个等级都会出现
pub fn grade_distribution(values: &[f64]) -> Vec<DistributionBucket> {
    let mut counts = [0usize; DEFAULT_SCALE.len()];
    for &v in values {
        let letter = letter_grade(v);
        if let Some(idx) = DEFAULT_SCALE.iter().position(|(l, _)| *l == letter) {
            counts[idx] += 1;
        }
    }

    let total = values.len() as f64;
    DEFAULT_SCALE
        .iter()
        .zip(counts)
        .map(|((letter, _), count)| DistributionBucket {
            letter: (*letter).to_string(),
            count,
            percentage: round2(percentage(count as f64, total)),
        })
        .collect()
}
