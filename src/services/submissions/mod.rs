pub mod submit;

use crate::access::Actor;
use crate::errors::Result;
use crate::models::submissions::{SubmissionContent, SubmitResponse};

use super::ServiceContext;

pub struct SubmissionService {
    ctx: ServiceContext,
}

impl SubmissionService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn submit_assignment(
        &self,
        actor: &Actor,
        assignment_id: i64,
        content: SubmissionContent,
    ) -> Result<SubmitResponse> {
        submit::submit_assignment(self, actor, assignment_id, content).await
    }
}
