//! 访问控制
//!
//! 每个入口在读写数据之前都通过 [`AccessGate`] 做一次检查，授权策略只在这里定义。
//! 管理员总是放行。

mod class_gate;

pub use class_gate::ClassMembershipGate;

use serde::Serialize;

use crate::errors::Result;
use crate::models::users::UserRole;

/// 发起操作的用户
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAssignment,
    UpdateAssignment,
    DeleteAssignment,
    ViewAssignment,
    SubmitAssignment,
    GradeSubmission,
    ViewReport,
    ViewStudentSummary,
}

/// 被访问的资源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    /// 班级本身
    Class(i64),
    /// 班级下由 `owner_id` 布置的作业
    Assignment { class_id: i64, owner_id: i64 },
    /// 班级中的某个学生
    Student { class_id: i64, student_id: i64 },
}

impl AccessTarget {
    pub fn class_id(&self) -> i64 {
        match *self {
            AccessTarget::Class(class_id) => class_id,
            AccessTarget::Assignment { class_id, .. } => class_id,
            AccessTarget::Student { class_id, .. } => class_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NotOwner,
    NotEnrolled,
    InsufficientRole,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::NotOwner => write!(f, "not_owner"),
            DenialReason::NotEnrolled => write!(f, "not_enrolled"),
            DenialReason::InsufficientRole => write!(f, "insufficient_role"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenialReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// 访问检查，无副作用
#[async_trait::async_trait]
pub trait AccessGate: Send + Sync {
    async fn check(
        &self,
        actor: &Actor,
        operation: Operation,
        target: AccessTarget,
    ) -> Result<AccessDecision>;
}
