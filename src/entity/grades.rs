//! 评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub assignment_id: i64,
    pub submission_id: i64,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    #[sea_orm(column_type = "Double")]
    pub max_score: f64,
    #[sea_orm(column_type = "Double")]
    pub percentage: f64,
    pub letter_grade: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    /// JSON 形式的评分细则明细
    #[sea_orm(column_type = "Text", nullable)]
    pub rubric: Option<String>,
    pub grader_id: i64,
    pub graded_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_grade(self) -> crate::models::grades::Grade {
        use chrono::{DateTime, Utc};

        crate::models::grades::Grade {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            assignment_id: self.assignment_id,
            submission_id: self.submission_id,
            score: self.score,
            max_score: self.max_score,
            percentage: self.percentage,
            letter_grade: self.letter_grade,
            comments: self.comments,
            rubric: self
                .rubric
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            grader_id: self.grader_id,
            graded_at: DateTime::<Utc>::from_timestamp(self.graded_at, 0).unwrap_or_default(),
        }
    }
}
