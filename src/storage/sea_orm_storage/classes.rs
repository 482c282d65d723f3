//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::classes::Entity as Classes;
use crate::errors::{GradebookError, Result};
use crate::models::classes::Class;
use sea_orm::EntityTrait;

impl SeaOrmStorage {
    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }
}
