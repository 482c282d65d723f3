use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitResponse {
    pub submission: Submission,
    /// 是否覆盖了已有提交
    pub resubmitted: bool,
}
