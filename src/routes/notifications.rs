use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::GradebookError;
use crate::middlewares::{self, RequireJWT};
use crate::models::common::ApiResponse;
use crate::models::notifications::NotificationListResponse;
use crate::storage::Storage;

// 当前用户的站内通知
pub async fn list_my_notifications(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
) -> Result<HttpResponse, GradebookError> {
    let actor = RequireJWT::actor(&req)?;
    let items = storage.list_user_notifications(actor.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        NotificationListResponse { items },
        "获取成功",
    )))
}

// 配置路由
pub fn configure_notifications_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_my_notifications))),
    );
}
