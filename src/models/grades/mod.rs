pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Grade, GradeRecord, StudentGradeItem};
pub use requests::GradeSubmissionRequest;
pub use responses::{GradeResponse, StudentSummary, SummaryItem};
