//! 对账计算
//!
//! 在读学生集合减去已提交学生集合得到缺交名单，迟交与逾期时长都按截止时间实时计算。

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::grade_math::{descriptive_stats, grade_distribution};
use crate::models::assignments::Assignment;
use crate::models::class_users::EnrolledStudent;
use crate::models::reports::{
    AssignmentSummary, GradeView, MissingStudent, SubmissionRecord, SubmissionReport,
    SubmissionRow, SubmissionStatistics,
};
use crate::models::submissions::SubmissionStatus;
use crate::utils::hours_between;

/// 由提交记录与在读学生名单生成报告
///
/// `status` 只过滤返回的提交列表，缺交名单与统计始终基于全部提交。
pub fn reconcile(
    assignment: &Assignment,
    records: Vec<SubmissionRecord>,
    enrolled: &[EnrolledStudent],
    now: DateTime<Utc>,
    status: Option<SubmissionStatus>,
) -> SubmissionReport {
    let due = assignment.due_date;

    let submitted: HashSet<i64> = records.iter().map(|r| r.submission.student_id).collect();

    let missing: Vec<MissingStudent> = enrolled
        .iter()
        .filter(|s| !submitted.contains(&s.student_id))
        .map(|s| MissingStudent {
            student_id: s.student_id,
            student_name: s.name.clone(),
            email: s.email.clone(),
            username: s.username.clone(),
            is_late: now > due,
            hours_past_due: hours_between(due, now).max(0.0),
        })
        .collect();

    let rows: Vec<SubmissionRow> = records.into_iter().map(|r| to_row(r, due)).collect();

    let total_submitted = rows.len();
    let total_graded = rows
        .iter()
        .filter(|r| r.status == SubmissionStatus::Graded)
        .count();
    let late_submissions = rows.iter().filter(|r| r.is_late).count();

    let statistics = SubmissionStatistics {
        total_enrolled: enrolled.len(),
        total_submitted,
        total_missing: missing.len(),
        total_graded,
        pending_grading: total_submitted - total_graded,
        late_submissions,
        on_time_submissions: total_submitted - late_submissions,
        submission_rate: rate(total_submitted, enrolled.len()),
        grading_rate: rate(total_graded, total_submitted),
    };

    let percentages: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.grade.as_ref().map(|g| g.percentage))
        .collect();
    let (grade_statistics, grade_distribution) = if percentages.is_empty() {
        (None, None)
    } else {
        (
            Some(descriptive_stats(&percentages)),
            Some(grade_distribution(&percentages)),
        )
    };

    let submissions = match status {
        Some(status) => rows.into_iter().filter(|r| r.status == status).collect(),
        None => rows,
    };

    SubmissionReport {
        assignment: AssignmentSummary::from(assignment),
        submissions,
        missing,
        statistics,
        grade_statistics,
        grade_distribution,
        generated_at: now,
    }
}

fn to_row(record: SubmissionRecord, due: DateTime<Utc>) -> SubmissionRow {
    let SubmissionRecord {
        submission,
        student,
        grade,
        grader_name,
    } = record;

    let grade = grade.map(|g| GradeView {
        grade_id: g.id,
        score: g.score,
        max_score: g.max_score,
        percentage: g.percentage,
        letter_grade: g.letter_grade,
        comments: g.comments,
        graded_at: g.graded_at,
        grader_id: g.grader_id,
        grader_name,
    });

    SubmissionRow {
        submission_id: submission.id,
        student_id: submission.student_id,
        student_name: student.name,
        email: student.email,
        username: student.username,
        status: submission.status,
        submission_text: submission.submission_text,
        attachments: submission.attachments,
        submitted_at: submission.submitted_at,
        is_late: submission.submitted_at > due,
        hours_late: hours_between(due, submission.submitted_at).max(0.0),
        grade,
    }
}

/// 四舍五入的整数百分比，分母为 0 时为 0
fn rate(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}
