use tracing::info;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    AssignmentCreate,
    AssignmentUpdate,
    AssignmentDelete,
    SubmissionSubmit,
    SubmissionGrade,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AssignmentCreate => "assignment.create",
            AuditAction::AssignmentUpdate => "assignment.update",
            AuditAction::AssignmentDelete => "assignment.delete",
            AuditAction::SubmissionSubmit => "submission.submit",
            AuditAction::SubmissionGrade => "submission.grade",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub actor_id: i64,
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(action: AuditAction, actor_id: i64, details: serde_json::Value) -> Self {
        Self {
            action,
            actor_id,
            details,
        }
    }
}

#[async_trait::async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// 以结构化日志输出审计记录（target = "audit"）
#[derive(Debug, Default)]
pub struct TracingAuditLog;

#[async_trait::async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        info!(
            target: "audit",
            action = entry.action.as_str(),
            actor_id = entry.actor_id,
            details = %entry.details,
        );
        Ok(())
    }
}
