use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    assignments::{Assignment, AssignmentPatch, DeleteOutcome, NewAssignment},
    class_users::{ClassUser, EnrolledStudent},
    classes::Class,
    grades::{Grade, GradeRecord, StudentGradeItem},
    notifications::{NewNotification, Notification},
    reports::SubmissionRecord,
    submissions::{Submission, SubmissionContent},
    users::User,
};

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

/// 存储句柄
///
/// 由启动流程创建后以 `Arc<dyn Storage>` 显式注入各个服务，核心逻辑不持有任何全局连接。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 班级
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;

    /// 选课（只读）
    // 获取用户在班级中的成员记录
    async fn get_class_user(&self, class_id: i64, user_id: i64) -> Result<Option<ClassUser>>;
    // 列出班级内所有在读学生
    async fn list_active_students(&self, class_id: i64) -> Result<Vec<EnrolledStudent>>;

    /// 作业
    // 创建作业（状态为 active）
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出班级作业
    async fn list_class_assignments(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<Assignment>>;
    // 按补丁更新作业
    async fn update_assignment(
        &self,
        id: i64,
        patch: AssignmentPatch,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Assignment>>;
    // 删除作业：有提交时软删除，否则硬删除
    async fn delete_assignment(
        &self,
        id: i64,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<DeleteOutcome>>;

    /// 提交
    // 按 (作业, 学生) 插入或覆盖提交，返回提交与是否为覆盖
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: SubmissionContent,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(Submission, bool)>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出作业的全部提交，附带成绩、学生资料与评分人
    async fn list_submission_records(&self, assignment_id: i64) -> Result<Vec<SubmissionRecord>>;

    /// 成绩
    // 在同一事务中将提交标记为已评分并写入成绩，返回成绩与是否为重新评分
    async fn record_grade(&self, record: GradeRecord) -> Result<(Grade, bool)>;
    // 获取学生某作业的成绩
    async fn get_grade(&self, assignment_id: i64, student_id: i64) -> Result<Option<Grade>>;
    // 列出学生在某班级的全部成绩
    async fn list_student_grades(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Vec<StudentGradeItem>>;

    /// 通知
    // 批量写入站内通知
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64>;
    // 列出用户的站内通知
    async fn list_user_notifications(&self, user_id: i64) -> Result<Vec<Notification>>;
}

/// 按配置创建存储并运行迁移
pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
