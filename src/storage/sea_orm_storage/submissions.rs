//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{GradebookError, Result};
use crate::models::reports::SubmissionRecord;
use crate::models::submissions::{Submission, SubmissionContent, SubmissionStatus};
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 插入或覆盖提交
    ///
    /// 以 (assignment_id, student_id) 唯一索引做 upsert，并发重复提交只会留下最后一次写入。
    /// 已评分的提交不允许覆盖。
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: SubmissionContent,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(Submission, bool)> {
        let attachments = serde_json::to_string(&content.attachments)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::transaction(format!("开启提交事务失败: {e}")))?;

        let result = upsert_in_txn(
            &txn,
            assignment_id,
            student_id,
            content.submission_text,
            attachments,
            submitted_at.timestamp(),
        )
        .await;

        match result {
            Ok(outcome) => {
                txn.commit()
                    .await
                    .map_err(|e| GradebookError::transaction(format!("提交事务失败: {e}")))?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交，附带成绩、学生资料与评分人姓名
    pub async fn list_submission_records_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionRecord>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交列表失败: {e}")))?;

        let mut grades: HashMap<i64, _> = Grades::find()
            .filter(GradeColumn::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩列表失败: {e}")))?
            .into_iter()
            .map(|g| (g.submission_id, g.into_grade()))
            .collect();

        let mut grader_ids: Vec<i64> = grades.values().map(|g| g.grader_id).collect();
        grader_ids.sort_unstable();
        grader_ids.dedup();

        let grader_names: HashMap<i64, String> = if grader_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(grader_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    GradebookError::database_operation(format!("查询评分人失败: {e}"))
                })?
                .into_iter()
                .map(|u| {
                    let user = u.into_user();
                    (user.id, user.name().to_string())
                })
                .collect()
        };

        Ok(rows
            .into_iter()
            .filter_map(|(submission, student)| {
                let student = student?.into_enrolled_student();
                let grade = grades.remove(&submission.id);
                let grader_name = grade
                    .as_ref()
                    .and_then(|g| grader_names.get(&g.grader_id).cloned());
                Some(SubmissionRecord {
                    submission: submission.into_submission(),
                    student,
                    grade,
                    grader_name,
                })
            })
            .collect())
    }
}

async fn upsert_in_txn(
    txn: &DatabaseTransaction,
    assignment_id: i64,
    student_id: i64,
    submission_text: Option<String>,
    attachments: String,
    submitted_at: i64,
) -> Result<(Submission, bool)> {
    let key = Condition::all()
        .add(Column::AssignmentId.eq(assignment_id))
        .add(Column::StudentId.eq(student_id));

    let existing = Submissions::find()
        .filter(key.clone())
        .one(txn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

    if existing
        .as_ref()
        .is_some_and(|s| s.status == SubmissionStatus::Graded.to_string())
    {
        return Err(GradebookError::submission_already_graded(
            "该作业已评分，不能重新提交",
        ));
    }

    let model = ActiveModel {
        assignment_id: Set(assignment_id),
        student_id: Set(student_id),
        submission_text: Set(submission_text),
        attachments: Set(Some(attachments)),
        status: Set(SubmissionStatus::Submitted.to_string()),
        submitted_at: Set(submitted_at),
        graded_at: Set(None),
        updated_at: Set(submitted_at),
        ..Default::default()
    };

    // 查询与写入之间可能有评分提交，冲突更新只作用于未评分的行
    if write_submission(txn, model).await? == 0 {
        return Err(GradebookError::submission_already_graded(
            "该作业已评分，不能重新提交",
        ));
    }

    let saved = Submissions::find()
        .filter(key)
        .one(txn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?
        .ok_or_else(|| GradebookError::database_operation("保存提交后未能读取记录"))?;

    Ok((saved.into_submission(), existing.is_some()))
}

/// 按 (assignment_id, student_id) 插入或覆盖提交，已评分的行保持不变，返回受影响行数
async fn write_submission(txn: &DatabaseTransaction, model: ActiveModel) -> Result<u64> {
    Submissions::insert(model)
        .on_conflict(
            OnConflict::columns([Column::AssignmentId, Column::StudentId])
                .update_columns([
                    Column::SubmissionText,
                    Column::Attachments,
                    Column::SubmittedAt,
                    Column::UpdatedAt,
                ])
                .action_and_where(
                    Expr::col((Submissions, Column::Status))
                        .eq(SubmissionStatus::Submitted.to_string()),
                )
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("保存提交失败: {e}")))
}
