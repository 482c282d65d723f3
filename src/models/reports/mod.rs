pub mod entities;
pub mod requests;

pub use entities::{
    AssignmentSummary, GradeView, MissingStudent, SubmissionRecord, SubmissionReport,
    SubmissionRow, SubmissionStatistics,
};
pub use requests::{ExportFormat, ExportQuery, ReportQuery};
