//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::{
    Assignment, AssignmentPatch, AssignmentStatus, DeleteOutcome, NewAssignment,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, assignment: NewAssignment) -> Result<Assignment> {
        let now = assignment.created_at.timestamp();

        let model = ActiveModel {
            class_id: Set(assignment.class_id),
            teacher_id: Set(assignment.teacher_id),
            title: Set(assignment.title),
            description: Set(assignment.description),
            due_date: Set(assignment.due_date.timestamp()),
            max_points: Set(assignment.max_points),
            assignment_type: Set(assignment.assignment_type.to_string()),
            status: Set(AssignmentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出班级作业，按截止时间升序
    pub async fn list_class_assignments_impl(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find().filter(Column::ClassId.eq(class_id));

        if !include_inactive {
            select = select.filter(Column::Status.eq(AssignmentStatus::Active.to_string()));
        }

        let rows = select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 按补丁更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        patch: AssignmentPatch,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Assignment>> {
        // 先检查作业是否存在
        let existing = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        if existing.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(updated_at.timestamp()),
            ..Default::default()
        };

        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = patch.due_date {
            model.due_date = Set(due_date.timestamp());
        }
        if let Some(max_points) = patch.max_points {
            model.max_points = Set(max_points);
        }
        if let Some(assignment_type) = patch.assignment_type {
            model.assignment_type = Set(assignment_type.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业
    ///
    /// 在事务内重新统计提交数：有提交则软删除（状态置为 inactive），保留提交与成绩；
    /// 否则删除记录。提交到作业的外键为 RESTRICT，并发写入的提交不会被级联删除。
    pub async fn delete_assignment_impl(
        &self,
        id: i64,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<DeleteOutcome>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::transaction(format!("开启删除作业事务失败: {e}")))?;

        let result = delete_in_txn(&txn, id, updated_at.timestamp()).await;

        match result {
            Ok(outcome) => {
                txn.commit().await.map_err(|e| {
                    GradebookError::transaction(format!("提交删除作业事务失败: {e}"))
                })?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }
}

async fn delete_in_txn(
    txn: &DatabaseTransaction,
    id: i64,
    updated_at: i64,
) -> Result<Option<DeleteOutcome>> {
    let existing = Assignments::find_by_id(id)
        .one(txn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

    if existing.is_none() {
        return Ok(None);
    }

    if count_submissions(txn, id).await? > 0 {
        let model = ActiveModel {
            id: Set(id),
            status: Set(AssignmentStatus::Inactive.to_string()),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        model
            .update(txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("停用作业失败: {e}")))?;
        Ok(Some(DeleteOutcome::Deactivated))
    } else {
        Assignments::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除作业失败: {e}")))?;
        Ok(Some(DeleteOutcome::Deleted))
    }
}

async fn count_submissions<C: ConnectionTrait>(conn: &C, assignment_id: i64) -> Result<u64> {
    Submissions::find()
        .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
        .count(conn)
        .await
        .map_err(|e| GradebookError::database_operation(format!("统计提交数失败: {e}")))
}
