use actix_web::{HttpRequest, HttpResponse, web};

use super::{reports, submissions};
use crate::errors::GradebookError;
use crate::middlewares::{self, RequireJWT};
use crate::models::assignments::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::common::ApiResponse;
use crate::services::AssignmentService;

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    body: web::Json<CreateAssignmentRequest>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let assignment = service
        .create_assignment(&actor, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
}

// 获取作业详情
pub async fn get_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let assignment = service.get_assignment(&actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "获取成功")))
}

// 更新作业
pub async fn update_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    path: web::Path<i64>,
    body: web::Json<UpdateAssignmentRequest>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let assignment = service
        .update_assignment(&actor, path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业更新成功")))
}

// 删除作业（有提交时停用）
pub async fn delete_assignment(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let resp = service
        .delete_assignment(&actor, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "作业已删除")))
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::post().to(create_assignment)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment))
                    .route(web::delete().to(delete_assignment)),
            )
            // 学生提交作业
            .service(
                web::resource("/{id}/submissions")
                    .route(web::post().to(submissions::submit_assignment)),
            )
            // 提交对账报告与导出，权限在业务层检查
            .service(web::resource("/{id}/report").route(web::get().to(reports::get_report)))
            .service(
                web::resource("/{id}/report/export")
                    .route(web::get().to(reports::export_report)),
            ),
    );
}
