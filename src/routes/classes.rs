use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::GradebookError;
use crate::middlewares::{self, RequireJWT};
use crate::models::assignments::{AssignmentListResponse, ListAssignmentsQuery};
use crate::models::common::ApiResponse;
use crate::services::{AssignmentService, GradeService};

// 列出班级作业
pub async fn list_class_assignments(
    req: HttpRequest,
    service: web::Data<AssignmentService>,
    path: web::Path<i64>,
    query: web::Query<ListAssignmentsQuery>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let items = service
        .list_class_assignments(&actor, path.into_inner(), query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentListResponse { items },
        "获取成功",
    )))
}

// 学生在班级内的加权总评
pub async fn get_student_summary(
    req: HttpRequest,
    service: web::Data<GradeService>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let (class_id, student_id) = path.into_inner();
    let summary = service
        .student_summary(&actor, class_id, student_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "获取成功")))
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{class_id}/assignments")
                    .route(web::get().to(list_class_assignments)),
            )
            .service(
                web::resource("/{class_id}/students/{student_id}/summary")
                    .route(web::get().to(get_student_summary)),
            ),
    );
}
