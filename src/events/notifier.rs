use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::models::notifications::{NewNotification, NotificationKind};
use crate::storage::Storage;
use crate::utils::Clock;

/// 需要通知的业务事件
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    AssignmentCreated {
        assignment_id: i64,
        class_id: i64,
        title: String,
        due_date: chrono::DateTime<chrono::Utc>,
    },
    AssignmentUpdated {
        assignment_id: i64,
        class_id: i64,
        title: String,
    },
    GradeReleased {
        assignment_id: i64,
        student_id: i64,
        title: String,
        letter_grade: String,
        percentage: f64,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationEvent::AssignmentCreated { .. } => NotificationKind::AssignmentCreated,
            NotificationEvent::AssignmentUpdated { .. } => NotificationKind::AssignmentUpdated,
            NotificationEvent::GradeReleased { .. } => NotificationKind::GradeReleased,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> Result<()>;
}

/// 写入站内通知表，通知时间取自注入的时钟
pub struct StorageNotifier {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl StorageNotifier {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    async fn to_class(
        &self,
        class_id: i64,
        assignment_id: i64,
        kind: NotificationKind,
        title: String,
        content: Option<String>,
    ) -> Result<Vec<NewNotification>> {
        let students = self.storage.list_active_students(class_id).await?;
        let now = self.clock.now();
        Ok(students
            .into_iter()
            .map(|s| NewNotification {
                user_id: s.student_id,
                kind,
                title: title.clone(),
                content: content.clone(),
                reference_type: Some("assignment".to_string()),
                reference_id: Some(assignment_id),
                created_at: now,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl Notifier for StorageNotifier {
    async fn notify(&self, event: &NotificationEvent) -> Result<()> {
        let batch = match event {
            NotificationEvent::AssignmentCreated {
                assignment_id,
                class_id,
                title,
                due_date,
            } => {
                self.to_class(
                    *class_id,
                    *assignment_id,
                    event.kind(),
                    format!("新作业：{title}"),
                    Some(format!("截止时间：{}", due_date.to_rfc3339())),
                )
                .await?
            }
            NotificationEvent::AssignmentUpdated {
                assignment_id,
                class_id,
                title,
            } => {
                self.to_class(
                    *class_id,
                    *assignment_id,
                    event.kind(),
                    format!("作业已更新：{title}"),
                    None,
                )
                .await?
            }
            NotificationEvent::GradeReleased {
                assignment_id,
                student_id,
                title,
                letter_grade,
                percentage,
            } => vec![NewNotification {
                user_id: *student_id,
                kind: event.kind(),
                title: format!("成绩已发布：{title}"),
                content: Some(format!("{letter_grade}（{percentage:.2}%）")),
                reference_type: Some("assignment".to_string()),
                reference_id: Some(*assignment_id),
                created_at: self.clock.now(),
            }],
        };

        let written = self.storage.create_notifications(batch).await?;
        debug!(kind = %event.kind(), written, "站内通知已写入");
        Ok(())
    }
}
