pub mod entities;

pub use entities::{ClassUser, ClassUserRole, EnrolledStudent, EnrollmentStatus};
