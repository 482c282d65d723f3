use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::GradebookError;
use crate::middlewares::RequireJWT;
use crate::models::common::ApiResponse;
use crate::models::reports::{ExportFormat, ExportQuery, ReportQuery};
use crate::services::ReportService;

// 作业提交对账报告
pub async fn get_report(
    req: HttpRequest,
    service: web::Data<ReportService>,
    path: web::Path<i64>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let report = service
        .get_submissions_report(&actor, path.into_inner(), query.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "获取成功")))
}

// 导出报告，默认 CSV
pub async fn export_report(
    req: HttpRequest,
    service: web::Data<ReportService>,
    path: web::Path<i64>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let query = query.into_inner();
    let format = match query.format.as_deref() {
        Some(f) => f.parse::<ExportFormat>().map_err(GradebookError::validation)?,
        None => ExportFormat::default(),
    };

    let file = service
        .export_report(&actor, path.into_inner(), format, query.status)
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.body))
}
