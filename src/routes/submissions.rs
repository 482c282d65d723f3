use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::GradebookError;
use crate::middlewares::{self, RequireJWT};
use crate::models::common::ApiResponse;
use crate::models::grades::GradeSubmissionRequest;
use crate::models::submissions::SubmissionContent;
use crate::services::{GradeService, SubmissionService};

// 提交作业（截止前可覆盖）
pub async fn submit_assignment(
    req: HttpRequest,
    service: web::Data<SubmissionService>,
    path: web::Path<i64>,
    body: web::Json<SubmissionContent>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let resp = service
        .submit_assignment(&actor, path.into_inner(), body.into_inner())
        .await?;
    let message = if resp.resubmitted {
        "提交已更新"
    } else {
        "提交成功"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, message)))
}

// 评分
pub async fn grade_submission(
    req: HttpRequest,
    service: web::Data<GradeService>,
    path: web::Path<i64>,
    body: web::Json<GradeSubmissionRequest>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let resp = service
        .grade_submission(&actor, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "评分成功")))
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}/grade").route(web::post().to(grade_submission))),
    );
}
