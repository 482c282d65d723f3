pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{
    Assignment, AssignmentPatch, AssignmentStatus, AssignmentType, DeleteOutcome, NewAssignment,
};
pub use requests::{CreateAssignmentRequest, ListAssignmentsQuery, UpdateAssignmentRequest};
pub use responses::{AssignmentListResponse, DeleteAssignmentResponse};
