use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssignmentPatch, AssignmentType};

// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: f64,
    #[serde(default)]
    pub assignment_type: Option<AssignmentType>,
}

// 更新作业请求，未知字段会被忽略
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_points: Option<f64>,
    pub assignment_type: Option<AssignmentType>,
}

impl From<UpdateAssignmentRequest> for AssignmentPatch {
    fn from(req: UpdateAssignmentRequest) -> Self {
        AssignmentPatch {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            max_points: req.max_points,
            assignment_type: req.assignment_type,
        }
    }
}

// 班级作业列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ListAssignmentsQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
