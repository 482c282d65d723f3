pub mod export;
pub mod reconcile;
pub mod report;

pub use export::ExportFile;

use crate::access::Actor;
use crate::errors::Result;
use crate::models::reports::{ExportFormat, SubmissionReport};
use crate::models::submissions::SubmissionStatus;

use super::ServiceContext;

pub struct ReportService {
    ctx: ServiceContext,
}

impl ReportService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn get_submissions_report(
        &self,
        actor: &Actor,
        assignment_id: i64,
        status: Option<SubmissionStatus>,
    ) -> Result<SubmissionReport> {
        report::get_submissions_report(self, actor, assignment_id, status).await
    }

    /// 导出报告，只做编码，不做额外计算
    pub async fn export_report(
        &self,
        actor: &Actor,
        assignment_id: i64,
        format: ExportFormat,
        status: Option<SubmissionStatus>,
    ) -> Result<ExportFile> {
        let report = self
            .get_submissions_report(actor, assignment_id, status)
            .await?;
        export::encode_report(&report, format)
    }
}
