pub mod entities;
pub mod responses;

pub use entities::{Submission, SubmissionContent, SubmissionStatus};
pub use responses::SubmitResponse;
