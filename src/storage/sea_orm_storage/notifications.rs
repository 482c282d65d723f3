//! 站内通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{GradebookError, Result};
use crate::models::notifications::{NewNotification, Notification};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量写入通知，返回写入条数
    pub async fn create_notifications_impl(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<u64> {
        if notifications.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启通知事务失败: {e}")))?;

        let mut inserted = 0u64;
        for n in notifications {
            let model = ActiveModel {
                user_id: Set(n.user_id),
                notification_type: Set(n.kind.to_string()),
                title: Set(n.title),
                content: Set(n.content),
                reference_type: Set(n.reference_type),
                reference_id: Set(n.reference_id),
                is_read: Set(false),
                created_at: Set(n.created_at.timestamp()),
                ..Default::default()
            };

            if let Err(e) = model.insert(&txn).await {
                let _ = txn.rollback().await;
                return Err(GradebookError::database_operation(format!(
                    "写入通知失败: {e}"
                )));
            }
            inserted += 1;
        }

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交通知事务失败: {e}")))?;

        Ok(inserted)
    }

    /// 列出用户的通知，最新的在前
    pub async fn list_user_notifications_impl(&self, user_id: i64) -> Result<Vec<Notification>> {
        let rows = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询通知失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_notification()).collect())
    }
}
