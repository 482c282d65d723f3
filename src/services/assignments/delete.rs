use tracing::info;

use super::{AssignmentService, assignment_target};
use crate::access::{Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry};
use crate::models::assignments::{DeleteAssignmentResponse, DeleteOutcome};

pub async fn delete_assignment(
    service: &AssignmentService,
    actor: &Actor,
    assignment_id: i64,
) -> Result<DeleteAssignmentResponse> {
    let ctx = &service.ctx;

    let assignment = ctx
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    ctx.authorize(
        actor,
        Operation::DeleteAssignment,
        assignment_target(&assignment),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    // 已有提交时只停用，保留提交与成绩
    let outcome = ctx
        .storage
        .delete_assignment(assignment_id, ctx.clock.now())
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    match outcome {
        DeleteOutcome::Deactivated => info!(assignment_id, actor_id = actor.id, "作业已停用"),
        DeleteOutcome::Deleted => info!(assignment_id, actor_id = actor.id, "作业已删除"),
    }

    ctx.events.audit(AuditEntry::new(
        AuditAction::AssignmentDelete,
        actor.id,
        serde_json::json!({ "assignment_id": assignment_id, "outcome": outcome }),
    ));

    Ok(DeleteAssignmentResponse {
        assignment_id,
        outcome,
    })
}
