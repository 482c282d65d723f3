use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 站内通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationKind {
    AssignmentCreated,
    AssignmentUpdated,
    GradeReleased,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::AssignmentCreated => write!(f, "assignment_created"),
            NotificationKind::AssignmentUpdated => write!(f, "assignment_updated"),
            NotificationKind::GradeReleased => write!(f, "grade_released"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment_created" => Ok(NotificationKind::AssignmentCreated),
            "assignment_updated" => Ok(NotificationKind::AssignmentUpdated),
            "grade_released" => Ok(NotificationKind::GradeReleased),
            _ => Err(format!("Invalid notification kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的通知
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
