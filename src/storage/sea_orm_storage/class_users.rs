//! 班级用户关联存储操作

use super::SeaOrmStorage;
use crate::entity::class_users::{Column, Entity as ClassUsers};
use crate::entity::users::Entity as Users;
use crate::errors::{GradebookError, Result};
use crate::models::class_users::{ClassUser, ClassUserRole, EnrolledStudent, EnrollmentStatus};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 获取用户在班级中的成员记录
    pub async fn get_class_user_impl(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<ClassUser>> {
        let result = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.map(|m| m.into_class_user()))
    }

    /// 列出班级内所有在读学生
    ///
    /// 班级内昵称优先于用户的显示名。
    pub async fn list_active_students_impl(&self, class_id: i64) -> Result<Vec<EnrolledStudent>> {
        let rows = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::Role.eq(ClassUserRole::Student.to_string()))
                    .add(Column::Status.eq(EnrollmentStatus::Active.to_string())),
            )
            .order_by_asc(Column::UserId)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| {
                GradebookError::database_operation(format!("查询班级在读学生失败: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                let mut student = user?.into_enrolled_student();
                if let Some(name) = enrollment.profile_name.filter(|n| !n.is_empty()) {
                    student.name = name;
                }
                Some(student)
            })
            .collect())
    }
}
