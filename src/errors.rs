//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称与 HTTP 状态码。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::models::common::ApiResponse;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回稳定的数字错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - status_code() 方法 - 返回对外暴露的 HTTP 状态码
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> i32 {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status_code(&self) -> u16 {
                match self {
                    $(GradebookError::$variant(_) => $status,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    // 内部错误
    DatabaseConfig(1001, "Database Configuration Error", 500),
    DatabaseConnection(1002, "Database Connection Error", 503),
    DatabaseOperation(1003, "Database Operation Error", 500),
    Transaction(1004, "Transaction Error", 503),
    Serialization(1005, "Serialization Error", 500),
    // 通用调用方错误
    Validation(1006, "Validation Error", 400),
    Authentication(1007, "Authentication Error", 401),
    NotFound(1008, "Resource Not Found", 404),
    // 作业 / 提交 / 评分
    UnauthorizedClassAccess(2001, "Unauthorized Class Access", 403),
    DueDateMustBeFuture(2002, "Due Date Must Be Future", 400),
    AssignmentNotFound(2003, "Assignment Not Found", 404),
    AssignmentDeadlinePassed(2004, "Assignment Deadline Passed", 400),
    StudentNotEnrolled(2005, "Student Not Enrolled", 403),
    SubmissionNotFound(2006, "Submission Not Found", 404),
    UnauthorizedToGrade(2007, "Unauthorized To Grade", 403),
    InvalidScoreRange(2008, "Invalid Score Range", 400),
    NoValidFieldsToUpdate(2009, "No Valid Fields To Update", 400),
    SubmissionAlreadyGraded(2010, "Submission Already Graded", 409),
}

impl GradebookError {
    /// 是否为内部错误（不向调用方透露细节）
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// 调用方是否可以安全重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GradebookError::Transaction(_) | GradebookError::DatabaseConnection(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradebookError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for GradebookError {
    fn from(err: csv::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl ResponseError for GradebookError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(GradebookError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!(code = self.code(), error = %self, "内部错误");
            "服务器内部错误，请稍后重试".to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(ResponseError::status_code(self))
            .json(ApiResponse::error_empty(self.code(), message))
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradebookError::database_config("test").code(), 1001);
        assert_eq!(GradebookError::validation("test").code(), 1006);
        assert_eq!(GradebookError::unauthorized_class_access("test").code(), 2001);
        assert_eq!(GradebookError::submission_already_graded("test").code(), 2010);
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradebookError::assignment_deadline_passed("test").error_type(),
            "Assignment Deadline Passed"
        );
        assert_eq!(
            GradebookError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GradebookError::unauthorized_class_access("x").status_code(), 403);
        assert_eq!(GradebookError::due_date_must_be_future("x").status_code(), 400);
        assert_eq!(GradebookError::assignment_not_found("x").status_code(), 404);
        assert_eq!(GradebookError::assignment_deadline_passed("x").status_code(), 400);
        assert_eq!(GradebookError::student_not_enrolled("x").status_code(), 403);
        assert_eq!(GradebookError::submission_not_found("x").status_code(), 404);
        assert_eq!(GradebookError::unauthorized_to_grade("x").status_code(), 403);
        assert_eq!(GradebookError::invalid_score_range("x").status_code(), 400);
        assert_eq!(GradebookError::no_valid_fields_to_update("x").status_code(), 400);
    }

    #[test]
    fn test_internal_and_retryable() {
        let tx = GradebookError::transaction("rollback");
        assert!(tx.is_internal());
        assert!(tx.is_retryable());

        let op = GradebookError::database_operation("boom");
        assert!(op.is_internal());
        assert!(!op.is_retryable());

        assert!(!GradebookError::invalid_score_range("x").is_internal());
    }

    #[test]
    fn test_error_message() {
        let err = GradebookError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = GradebookError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[actix_web::test]
    async fn test_internal_error_response_hides_details() {
        let err = GradebookError::database_operation("UNIQUE constraint failed: grades.id");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("UNIQUE"));
        assert!(text.contains("1003"));
    }

    #[actix_web::test]
    async fn test_caller_error_response_keeps_message() {
        let err = GradebookError::invalid_score_range("分数必须在 0 到 100 之间");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("分数必须在 0 到 100 之间"));
    }
}
