//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod class_users;
mod classes;
mod grades;
mod notifications;
mod submissions;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{GradebookError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接，已运行迁移
    pub async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("内存数据库连接失败: {e}")))?;

        Self::migrate(&db).await?;

        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 班级模块
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    // 选课模块
    async fn get_class_user(&self, class_id: i64, user_id: i64) -> Result<Option<ClassUser>> {
        self.get_class_user_impl(class_id, user_id).await
    }

    async fn list_active_students(&self, class_id: i64) -> Result<Vec<EnrolledStudent>> {
        self.list_active_students_impl(class_id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_class_assignments(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<Assignment>> {
        self.list_class_assignments_impl(class_id, include_inactive)
            .await
    }

    async fn update_assignment(
        &self,
        id: i64,
        patch: AssignmentPatch,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, patch, updated_at).await
    }

    async fn delete_assignment(
        &self,
        id: i64,
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<DeleteOutcome>> {
        self.delete_assignment_impl(id, updated_at).await
    }

    // 提交模块
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: SubmissionContent,
        submitted_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(Submission, bool)> {
        self.upsert_submission_impl(assignment_id, student_id, content, submitted_at)
            .await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submission_records(&self, assignment_id: i64) -> Result<Vec<SubmissionRecord>> {
        self.list_submission_records_impl(assignment_id).await
    }

    // 成绩模块
    async fn record_grade(&self, record: GradeRecord) -> Result<(Grade, bool)> {
        self.record_grade_impl(record).await
    }

    async fn get_grade(&self, assignment_id: i64, student_id: i64) -> Result<Option<Grade>> {
        self.get_grade_impl(assignment_id, student_id).await
    }

    async fn list_student_grades(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Vec<StudentGradeItem>> {
        self.list_student_grades_impl(class_id, student_id).await
    }

    // 通知模块
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64> {
        self.create_notifications_impl(notifications).await
    }

    async fn list_user_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        self.list_user_notifications_impl(user_id).await
    }
}
