//! 测试辅助：内存数据库、种子数据、固定时钟与可观察的协作者

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

use crate::access::{Actor, ClassMembershipGate};
use crate::entity::{class_users, classes, users};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry, AuditLog, EventDispatcher, NotificationEvent, Notifier};
use crate::models::assignments::{Assignment, AssignmentType, NewAssignment};
use crate::models::class_users::EnrollmentStatus;
use crate::models::users::UserRole;
use crate::services::ServiceContext;
use crate::storage::{SeaOrmStorage, Storage};
use crate::utils::Clock;

pub(crate) const BASE_TS: i64 = 1_700_000_000;

pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
}

pub(crate) async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::in_memory().await.unwrap()
}

pub(crate) async fn seed_user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> i64 {
    users::ActiveModel {
        id: NotSet,
        username: Set(name.to_string()),
        email: Set(format!("{name}@school.test")),
        display_name: Set(Some(format!("{name} display"))),
        role: Set(role.to_string()),
        status: Set("active".to_string()),
        created_at: Set(BASE_TS),
        updated_at: Set(BASE_TS),
    }
    .insert(&storage.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_class(storage: &SeaOrmStorage, teacher_id: i64) -> i64 {
    classes::ActiveModel {
        id: NotSet,
        teacher_id: Set(teacher_id),
        class_name: Set(format!("class of {teacher_id}")),
        description: Set(None),
        created_at: Set(BASE_TS),
        updated_at: Set(BASE_TS),
    }
    .insert(&storage.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn enroll(
    storage: &SeaOrmStorage,
    class_id: i64,
    user_id: i64,
    status: EnrollmentStatus,
) {
    class_users::ActiveModel {
        id: NotSet,
        class_id: Set(class_id),
        user_id: Set(user_id),
        role: Set("student".to_string()),
        status: Set(status.to_string()),
        profile_name: Set(None),
        joined_at: Set(BASE_TS),
        updated_at: Set(BASE_TS),
    }
    .insert(&storage.db)
    .await
    .unwrap();
}

/// 可手动推进的时钟
pub(crate) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &NotificationEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub(crate) struct FailingNotifier;

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _event: &NotificationEvent) -> Result<()> {
        Err(GradebookError::database_connection("notification backend offline"))
    }
}

#[derive(Default)]
pub(crate) struct RecordingAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAuditLog {
    pub fn actions(&self) -> Vec<AuditAction> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action)
            .collect()
    }
}

#[async_trait::async_trait]
impl AuditLog for RecordingAuditLog {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// 一个班级的完整测试场景：
/// 管理员、班级教师、另一位教师、若干在读学生和一位未选课学生
pub(crate) struct Scenario {
    pub storage: SeaOrmStorage,
    pub ctx: ServiceContext,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub audit: Arc<RecordingAuditLog>,
    pub admin: Actor,
    pub owner: Actor,
    pub other_teacher: Actor,
    pub outsider: Actor,
    pub class_id: i64,
    pub students: Vec<Actor>,
}

impl Scenario {
    pub async fn new(student_count: usize) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        Self::build(student_count, notifier.clone(), notifier).await
    }

    pub async fn with_failing_notifier(student_count: usize) -> Self {
        Self::build(
            student_count,
            Arc::new(FailingNotifier),
            Arc::new(RecordingNotifier::default()),
        )
        .await
    }

    async fn build(
        student_count: usize,
        dispatch_to: Arc<dyn Notifier>,
        notifier: Arc<RecordingNotifier>,
    ) -> Self {
        let storage = storage().await;
        let admin = seed_user(&storage, "admin", UserRole::Admin).await;
        let owner = seed_user(&storage, "owner", UserRole::Teacher).await;
        let other_teacher = seed_user(&storage, "other", UserRole::Teacher).await;
        let outsider = seed_user(&storage, "outsider", UserRole::Student).await;
        let class_id = seed_class(&storage, owner).await;

        let mut students = Vec::with_capacity(student_count);
        for i in 0..student_count {
            let id = seed_user(&storage, &format!("student{i:02}"), UserRole::Student).await;
            enroll(&storage, class_id, id, EnrollmentStatus::Active).await;
            students.push(Actor::new(id, UserRole::Student));
        }

        let shared: Arc<dyn Storage> = Arc::new(storage.clone());
        let clock = Arc::new(FixedClock::at(ts(BASE_TS)));
        let audit = Arc::new(RecordingAuditLog::default());
        let events = EventDispatcher::spawn(dispatch_to, audit.clone(), 64);
        let ctx = ServiceContext::new(
            shared.clone(),
            Arc::new(ClassMembershipGate::new(shared)),
            clock.clone(),
            events,
        );

        Self {
            storage,
            ctx,
            clock,
            notifier,
            audit,
            admin: Actor::new(admin, UserRole::Admin),
            owner: Actor::new(owner, UserRole::Teacher),
            other_teacher: Actor::new(other_teacher, UserRole::Teacher),
            outsider: Actor::new(outsider, UserRole::Student),
            class_id,
            students,
        }
    }

    /// 直接写入一份作业，截止时间为当前时间加 `hours_until_due` 小时
    pub async fn assignment(&self, hours_until_due: i64, max_points: f64) -> Assignment {
        self.ctx
            .storage
            .create_assignment(NewAssignment {
                class_id: self.class_id,
                teacher_id: self.owner.id,
                title: "Lab report".to_string(),
                description: None,
                due_date: self.clock.now() + chrono::Duration::hours(hours_until_due),
                max_points,
                assignment_type: AssignmentType::Lab,
                created_at: self.clock.now(),
            })
            .await
            .unwrap()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
