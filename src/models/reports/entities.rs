use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grade_math::{DescriptiveStats, DistributionBucket};
use crate::models::assignments::{Assignment, AssignmentStatus, AssignmentType};
use crate::models::submissions::SubmissionStatus;

/// 提交行的原始数据：提交 + 成绩 + 学生资料 + 评分人姓名
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub submission: crate::models::submissions::Submission,
    pub student: crate::models::class_users::EnrolledStudent,
    pub grade: Option<crate::models::grades::Grade>,
    pub grader_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AssignmentSummary {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: f64,
    pub assignment_type: AssignmentType,
    pub status: AssignmentStatus,
}

impl From<&Assignment> for AssignmentSummary {
    fn from(a: &Assignment) -> Self {
        Self {
            id: a.id,
            class_id: a.class_id,
            title: a.title.clone(),
            due_date: a.due_date,
            max_points: a.max_points,
            assignment_type: a.assignment_type,
            status: a.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GradeView {
    pub grade_id: i64,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub letter_grade: String,
    pub comments: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub grader_id: i64,
    pub grader_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SubmissionRow {
    pub submission_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub email: String,
    pub username: String,
    pub status: SubmissionStatus,
    pub submission_text: Option<String>,
    pub attachments: Vec<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub is_late: bool,
    pub hours_late: f64,
    pub grade: Option<GradeView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct MissingStudent {
    pub student_id: i64,
    pub student_name: String,
    pub email: String,
    pub username: String,
    pub is_late: bool,
    pub hours_past_due: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SubmissionStatistics {
    pub total_enrolled: usize,
    pub total_submitted: usize,
    pub total_missing: usize,
    pub total_graded: usize,
    pub pending_grading: usize,
    pub late_submissions: usize,
    pub on_time_submissions: usize,
    /// 四舍五入后的整数百分比
    pub submission_rate: u32,
    pub grading_rate: u32,
}

/// 作业提交对账报告，同时也是导出的数据源
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SubmissionReport {
    pub assignment: AssignmentSummary,
    pub submissions: Vec<SubmissionRow>,
    pub missing: Vec<MissingStudent>,
    pub statistics: SubmissionStatistics,
    pub grade_statistics: Option<DescriptiveStats>,
    pub grade_distribution: Option<Vec<DistributionBucket>>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
