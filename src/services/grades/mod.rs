pub mod grade;
pub mod summary;

use crate::access::Actor;
use crate::config::GradingConfig;
use crate::errors::Result;
use crate::models::grades::{GradeResponse, GradeSubmissionRequest, StudentSummary};

use super::ServiceContext;

pub struct GradeService {
    ctx: ServiceContext,
    grading: GradingConfig,
}

impl GradeService {
    pub fn new(ctx: ServiceContext, grading: GradingConfig) -> Self {
        Self { ctx, grading }
    }

    pub async fn grade_submission(
        &self,
        actor: &Actor,
        submission_id: i64,
        req: GradeSubmissionRequest,
    ) -> Result<GradeResponse> {
        grade::grade_submission(self, actor, submission_id, req).await
    }

    pub async fn student_summary(
        &self,
        actor: &Actor,
        class_id: i64,
        student_id: i64,
    ) -> Result<StudentSummary> {
        summary::student_summary(self, actor, class_id, student_id).await
    }
}
