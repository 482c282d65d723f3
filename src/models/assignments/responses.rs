use serde::Serialize;
use ts_rs::TS;

use super::entities::{Assignment, DeleteOutcome};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct DeleteAssignmentResponse {
    pub assignment_id: i64,
    pub outcome: DeleteOutcome,
}
