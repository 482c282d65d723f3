use super::{AssignmentService, assignment_target};
use crate::access::{AccessTarget, Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::{Assignment, AssignmentStatus};
use crate::models::users::UserRole;

pub async fn get_assignment(
    service: &AssignmentService,
    actor: &Actor,
    assignment_id: i64,
) -> Result<Assignment> {
    let ctx = &service.ctx;

    let assignment = ctx
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    ctx.authorize(
        actor,
        Operation::ViewAssignment,
        assignment_target(&assignment),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    // 学生只能看到进行中的作业
    if actor.role == UserRole::Student && assignment.status != AssignmentStatus::Active {
        return Err(GradebookError::assignment_not_found("作业不存在"));
    }

    Ok(assignment)
}

pub async fn list_class_assignments(
    service: &AssignmentService,
    actor: &Actor,
    class_id: i64,
    include_inactive: bool,
) -> Result<Vec<Assignment>> {
    let ctx = &service.ctx;

    if ctx.storage.get_class_by_id(class_id).await?.is_none() {
        return Err(GradebookError::not_found("班级不存在"));
    }

    ctx.authorize(
        actor,
        Operation::ViewAssignment,
        AccessTarget::Class(class_id),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    let include_inactive = include_inactive && actor.role != UserRole::Student;
    ctx.storage
        .list_class_assignments(class_id, include_inactive)
        .await
}
