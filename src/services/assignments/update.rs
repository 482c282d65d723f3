use tracing::info;

use super::{AssignmentService, assignment_target};
use crate::access::{Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::{AuditAction, AuditEntry, NotificationEvent};
use crate::models::assignments::{Assignment, AssignmentPatch, UpdateAssignmentRequest};
use crate::utils::validate::{validate_max_points, validate_title};

pub async fn update_assignment(
    service: &AssignmentService,
    actor: &Actor,
    assignment_id: i64,
    req: UpdateAssignmentRequest,
) -> Result<Assignment> {
    let ctx = &service.ctx;

    let existing = ctx
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    ctx.authorize(
        actor,
        Operation::UpdateAssignment,
        assignment_target(&existing),
        GradebookError::UnauthorizedClassAccess,
    )
    .await?;

    let mut patch = AssignmentPatch::from(req);
    if patch.is_empty() {
        return Err(GradebookError::no_valid_fields_to_update(
            "没有可更新的字段",
        ));
    }

    if let Some(title) = patch.title.as_mut() {
        validate_title(title).map_err(GradebookError::validation)?;
        *title = title.trim().to_string();
    }
    if let Some(max_points) = patch.max_points {
        validate_max_points(max_points).map_err(GradebookError::validation)?;
    }
    if patch.due_date.is_some_and(|due| due <= ctx.clock.now()) {
        return Err(GradebookError::due_date_must_be_future(
            "截止时间必须晚于当前时间",
        ));
    }

    let fields: Vec<&str> = [
        ("title", patch.title.is_some()),
        ("description", patch.description.is_some()),
        ("due_date", patch.due_date.is_some()),
        ("max_points", patch.max_points.is_some()),
        ("assignment_type", patch.assignment_type.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();

    let updated = ctx
        .storage
        .update_assignment(assignment_id, patch, ctx.clock.now())
        .await?
        .ok_or_else(|| GradebookError::assignment_not_found("作业不存在"))?;

    info!(assignment_id, actor_id = actor.id, ?fields, "作业已更新");

    ctx.events.notify(NotificationEvent::AssignmentUpdated {
        assignment_id: updated.id,
        class_id: updated.class_id,
        title: updated.title.clone(),
    });
    ctx.events.audit(AuditEntry::new(
        AuditAction::AssignmentUpdate,
        actor.id,
        serde_json::json!({ "assignment_id": assignment_id, "fields": fields }),
    ));

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::AssignmentType;
    use crate::test_support::Scenario;

    #[tokio::test]
    async fn test_update_applies_patch() {
        let s = Scenario::new(1).await;
        let service = AssignmentService::new(s.ctx.clone());
        let assignment = s.assignment(24, 20.0).await;

        let new_due = s.now() + chrono::Duration::hours(48);
        let updated = service
            .update_assignment(
                &s.owner,
                assignment.id,
                UpdateAssignmentRequest {
                    title: Some("Lab 2 ".to_string()),
                    due_date: Some(new_due),
                    assignment_type: Some(AssignmentType::Quiz),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Lab 2");
        assert_eq!(updated.due_date, new_due);
        assert_eq!(updated.assignment_type, AssignmentType::Quiz);
        assert_eq!(updated.max_points, 20.0);

        s.ctx.events.flush().await;
        assert_eq!(s.audit.actions(), vec![AuditAction::AssignmentUpdate]);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_patch() {
        let s = Scenario::new(0).await;
        let service = AssignmentService::new(s.ctx.clone());
        let assignment = s.assignment(24, 20.0).await;

        let err = service
            .update_assignment(&s.owner, assignment.id, UpdateAssignmentRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::NoValidFieldsToUpdate(_)));
    }

    #[tokio::test]
    async fn test_update_revalidates_due_date() {
        let s = Scenario::new(0).await;
        let service = AssignmentService::new(s.ctx.clone());
        let assignment = s.assignment(24, 20.0).await;

        let err = service
            .update_assignment(
                &s.owner,
                assignment.id,
                UpdateAssignmentRequest {
                    due_date: Some(s.now() - chrono::Duration::minutes(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::DueDateMustBeFuture(_)));
    }

    #[tokio::test]
    async fn test_update_owner_or_admin_only() {
        let s = Scenario::new(1).await;
        let service = AssignmentService::new(s.ctx.clone());
        let assignment = s.assignment(24, 20.0).await;
        let patch = || UpdateAssignmentRequest {
            description: Some("updated".to_string()),
            ..Default::default()
        };

        let err = service
            .update_assignment(&s.other_teacher, assignment.id, patch())
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::UnauthorizedClassAccess(_)));

        let updated = service
            .update_assignment(&s.admin, assignment.id, patch())
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("updated"));

        let err = service
            .update_assignment(&s.owner, 404, patch())
            .await
            .unwrap_err();
        assert!(matches!(err, GradebookError::AssignmentNotFound(_)));
    }
}
