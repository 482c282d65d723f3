use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::errors::GradebookError;
use crate::models::common::ApiResponse;

fn bad_request(message: String) -> actix_web::Error {
    let err = GradebookError::validation(message);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        err.code(),
        err.message().to_string(),
    ));
    InternalError::from_response(err, response).into()
}

// JSON 请求体解析错误处理器
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON 解析失败 {}: {}", req.path(), err);
    bad_request(format!("请求体格式错误: {err}"))
}

// 查询参数解析错误处理器
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("查询参数解析失败 {}: {}", req.path(), err);
    bad_request(format!("查询参数错误: {err}"))
}

// 路径参数解析错误处理器
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("路径参数解析失败 {}: {}", req.path(), err);
    bad_request(format!("路径参数错误: {err}"))
}
