//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{GradebookError, Result};
use crate::models::grades::{Grade, GradeRecord, StudentGradeItem};
use crate::models::submissions::SubmissionStatus;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 评分事务
    ///
    /// 提交状态置为 graded 与成绩 upsert 在同一事务内完成，任一步失败整体回滚，
    /// 并以可重试的 Transaction 错误返回。
    pub async fn record_grade_impl(&self, record: GradeRecord) -> Result<(Grade, bool)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::transaction(format!("开启评分事务失败: {e}")))?;

        match grade_in_txn(&txn, record).await {
            Ok(outcome) => {
                txn.commit()
                    .await
                    .map_err(|e| GradebookError::transaction(format!("提交评分事务失败: {e}")))?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    /// 获取学生某作业的成绩
    pub async fn get_grade_impl(&self, assignment_id: i64, student_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 列出学生在某班级的全部成绩及对应作业信息
    pub async fn list_student_grades_impl(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Vec<StudentGradeItem>> {
        let rows = Grades::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .order_by_asc(Column::AssignmentId)
            .find_also_related(Assignments)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(grade, assignment)| {
                let assignment = assignment?.into_assignment();
                Some(StudentGradeItem {
                    grade: grade.into_grade(),
                    assignment_title: assignment.title,
                    assignment_type: assignment.assignment_type,
                })
            })
            .collect())
    }
}

async fn grade_in_txn(txn: &DatabaseTransaction, record: GradeRecord) -> Result<(Grade, bool)> {
    let graded_at = record.graded_at.timestamp();

    // 1. 提交状态置为 graded
    let updated = Submissions::update_many()
        .col_expr(
            SubmissionColumn::Status,
            Expr::value(SubmissionStatus::Graded.to_string()),
        )
        .col_expr(SubmissionColumn::GradedAt, Expr::value(graded_at))
        .col_expr(SubmissionColumn::UpdatedAt, Expr::value(graded_at))
        .filter(SubmissionColumn::Id.eq(record.submission_id))
        .exec(txn)
        .await
        .map_err(|e| GradebookError::transaction(format!("更新提交状态失败: {e}")))?;

    if updated.rows_affected == 0 {
        return Err(GradebookError::submission_not_found(format!(
            "提交 {} 不存在",
            record.submission_id
        )));
    }

    let rubric = record
        .rubric
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    // 2. 按 (assignment_id, student_id) upsert 成绩，并发评分只会留下一行
    let key = Condition::all()
        .add(Column::AssignmentId.eq(record.assignment_id))
        .add(Column::StudentId.eq(record.student_id));

    let regraded = Grades::find()
        .filter(key.clone())
        .one(txn)
        .await
        .map_err(|e| GradebookError::transaction(format!("查询已有成绩失败: {e}")))?
        .is_some();

    let model = ActiveModel {
        student_id: Set(record.student_id),
        class_id: Set(record.class_id),
        assignment_id: Set(record.assignment_id),
        submission_id: Set(record.submission_id),
        score: Set(record.score),
        max_score: Set(record.max_score),
        percentage: Set(record.percentage),
        letter_grade: Set(record.letter_grade),
        comments: Set(record.comments),
        rubric: Set(rubric),
        grader_id: Set(record.grader_id),
        graded_at: Set(graded_at),
        created_at: Set(graded_at),
        updated_at: Set(graded_at),
        ..Default::default()
    };

    Grades::insert(model)
        .on_conflict(
            OnConflict::columns([Column::AssignmentId, Column::StudentId])
                .update_columns([
                    Column::SubmissionId,
                    Column::Score,
                    Column::MaxScore,
                    Column::Percentage,
                    Column::LetterGrade,
                    Column::Comments,
                    Column::Rubric,
                    Column::GraderId,
                    Column::GradedAt,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await
        .map_err(|e| GradebookError::transaction(format!("写入成绩失败: {e}")))?;

    let saved = Grades::find()
        .filter(key)
        .one(txn)
        .await
        .map_err(|e| GradebookError::transaction(format!("读取成绩失败: {e}")))?
        .ok_or_else(|| GradebookError::transaction("写入成绩后未能读取记录"))?;

    Ok((saved.into_grade(), regraded))
}
