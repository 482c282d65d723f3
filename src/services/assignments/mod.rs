pub mod create;
pub mod delete;
pub mod detail;
pub mod update;

use crate::access::{AccessTarget, Actor};
use crate::errors::Result;
use crate::models::assignments::{
    Assignment, CreateAssignmentRequest, DeleteAssignmentResponse, UpdateAssignmentRequest,
};

use super::ServiceContext;

pub struct AssignmentService {
    ctx: ServiceContext,
}

impl AssignmentService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create_assignment(
        &self,
        actor: &Actor,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        create::create_assignment(self, actor, req).await
    }

    pub async fn get_assignment(&self, actor: &Actor, assignment_id: i64) -> Result<Assignment> {
        detail::get_assignment(self, actor, assignment_id).await
    }

    pub async fn list_class_assignments(
        &self,
        actor: &Actor,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<Assignment>> {
        detail::list_class_assignments(self, actor, class_id, include_inactive).await
    }

    pub async fn update_assignment(
        &self,
        actor: &Actor,
        assignment_id: i64,
        req: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        update::update_assignment(self, actor, assignment_id, req).await
    }

    pub async fn delete_assignment(
        &self,
        actor: &Actor,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse> {
        delete::delete_assignment(self, actor, assignment_id).await
    }
}

/// 作业对应的访问目标
pub(crate) fn assignment_target(assignment: &Assignment) -> AccessTarget {
    AccessTarget::Assignment {
        class_id: assignment.class_id,
        owner_id: assignment.teacher_id,
    }
}
