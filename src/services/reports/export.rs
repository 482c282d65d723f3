//! 报告导出：CSV 与 JSON 两种编码

use crate::errors::{GradebookError, Result};
use crate::models::reports::{ExportFormat, SubmissionReport};

/// CSV 固定列顺序
pub const CSV_HEADERS: [&str; 13] = [
    "Student Name",
    "Email",
    "Username",
    "Status",
    "Submitted At",
    "Is Late",
    "Hours Late",
    "Score",
    "Percentage",
    "Letter Grade",
    "Graded At",
    "Grader",
    "Comments",
];

/// 导出的文件内容
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub content_type: &'static str,
    pub filename: String,
    pub body: Vec<u8>,
}

pub fn encode_report(report: &SubmissionReport, format: ExportFormat) -> Result<ExportFile> {
    match format {
        ExportFormat::Csv => Ok(ExportFile {
            content_type: "text/csv; charset=utf-8",
            filename: format!("assignment_{}_submissions.csv", report.assignment.id),
            body: to_csv(report)?,
        }),
        ExportFormat::Json => Ok(ExportFile {
            content_type: "application/json",
            filename: format!("assignment_{}_submissions.json", report.assignment.id),
            body: serde_json::to_vec_pretty(report)?,
        }),
    }
}

/// 每份提交一行，随后每位缺交学生一行
fn to_csv(report: &SubmissionReport) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADERS)?;

    for row in &report.submissions {
        let grade = row.grade.as_ref();
        wtr.write_record([
            row.student_name.clone(),
            row.email.clone(),
            row.username.clone(),
            row.status.to_string(),
            row.submitted_at.to_rfc3339(),
            row.is_late.to_string(),
            format!("{:.2}", row.hours_late),
            grade.map(|g| g.score.to_string()).unwrap_or_default(),
            grade
                .map(|g| format!("{:.2}", g.percentage))
                .unwrap_or_default(),
            grade.map(|g| g.letter_grade.clone()).unwrap_or_default(),
            grade.map(|g| g.graded_at.to_rfc3339()).unwrap_or_default(),
            grade
                .and_then(|g| g.grader_name.clone())
                .unwrap_or_default(),
            grade.and_then(|g| g.comments.clone()).unwrap_or_default(),
        ])?;
    }

    for student in &report.missing {
        wtr.write_record([
            student.student_name.clone(),
            student.email.clone(),
            student.username.clone(),
            "missing".to_string(),
            String::new(),
            student.is_late.to_string(),
            format!("{:.2}", student.hours_past_due),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| GradebookError::serialization(format!("CSV 生成失败: {e}")))
}
