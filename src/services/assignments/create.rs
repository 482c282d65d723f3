use tracing::info;

use super::AssignmentService;
use crate::access::{AccessTarget, Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry, NotificationEvent};
use crate::models::assignments::{Assignment, CreateAssignmentRequest, NewAssignment};
use crate::utils::validate::{validate_max_points, validate_title};

pub async fn create_assignment(
    service: &AssignmentService,
    actor: &Actor,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let ctx = &service.ctx;

    validate_title(&req.title).map_err(GradebookError::validation)?;
    validate_max_points(req.max_points).map_err(GradebookError::validation)?;

    if ctx.storage.get_class_by_id(req.class_id).await?.is_none() {
        return Err(GradebookError::not_found("班级不存在"));
    }

    ctx.authorize(
        actor,
        Operation::CreateAssignment,
        AccessTarget::Class(req.class_id),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    let now = ctx.clock.now();
    if req.due_date <= now {
        return Err(GradebookError::due_date_must_be_future(
            "截止时间必须晚于当前时间",
        ));
    }

    let assignment = ctx
        .storage
        .create_assignment(NewAssignment {
            class_id: req.class_id,
            teacher_id: actor.id,
            title: req.title.trim().to_string(),
            description: req.description,
            due_date: req.due_date,
            max_points: req.max_points,
            assignment_type: req.assignment_type.unwrap_or_default(),
            created_at: now,
        })
        .await?;

    info!(
        assignment_id = assignment.id,
        class_id = assignment.class_id,
        teacher_id = actor.id,
        "作业已创建"
    );

    ctx.events.notify(NotificationEvent::AssignmentCreated {
        assignment_id: assignment.id,
        class_id: assignment.class_id,
        title: assignment.title.clone(),
        due_date: assignment.due_date,
    });
    ctx.events.audit(AuditEntry::new(
        AuditAction::AssignmentCreate,
        actor.id,
        serde_json::json!({
            "assignment_id": assignment.id,
            "class_id": assignment.class_id,
            "due_date": assignment.due_date,
        }),
    ));

    Ok(assignment)
}
