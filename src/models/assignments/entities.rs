use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentType {
    #[default]
    Homework,
    Quiz,
    Exam,
    Project,
    Lab,
    Essay,
    Other,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Homework => "homework",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Exam => "exam",
            AssignmentType::Project => "project",
            AssignmentType::Lab => "lab",
            AssignmentType::Essay => "essay",
            AssignmentType::Other => "other",
        }
    }
}

impl std::fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homework" => Ok(AssignmentType::Homework),
            "quiz" => Ok(AssignmentType::Quiz),
            "exam" => Ok(AssignmentType::Exam),
            "project" => Ok(AssignmentType::Project),
            "lab" => Ok(AssignmentType::Lab),
            "essay" => Ok(AssignmentType::Essay),
            "other" => Ok(AssignmentType::Other),
            _ => Err(format!("Invalid assignment type: {s}")),
        }
    }
}

// 作业状态
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Inactive,
    Draft,
    Archived,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Inactive => write!(f, "inactive"),
            AssignmentStatus::Draft => write!(f, "draft"),
            AssignmentStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AssignmentStatus::Active),
            "inactive" => Ok(AssignmentStatus::Inactive),
            "draft" => Ok(AssignmentStatus::Draft),
            "archived" => Ok(AssignmentStatus::Archived),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的班级 ID
    pub class_id: i64,
    // 布置作业的教师 ID
    pub teacher_id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    // 满分
    pub max_points: f64,
    pub assignment_type: AssignmentType,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 新建作业所需字段（已校验）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub class_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_points: f64,
    pub assignment_type: AssignmentType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 作业更新补丁，只包含允许修改的字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_points: Option<f64>,
    pub assignment_type: Option<AssignmentType>,
}

impl AssignmentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.max_points.is_none()
            && self.assignment_type.is_none()
    }
}

/// 删除作业的结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum DeleteOutcome {
    /// 已有提交，仅将状态置为 inactive
    Deactivated,
    /// 无提交，记录已删除
    Deleted,
}
