/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，加载令牌对应的用户并要求其处于 active 状态，
 * 然后把 [`Actor`] 放进请求扩展供处理程序使用。
 *
 * ```rust,ignore
 * web::scope("/api/v1")
 *     .wrap(RequireJWT)
 *     .route("/assignments", web::post().to(create_assignment))
 *
 * async fn create_assignment(req: HttpRequest) -> Result<HttpResponse, GradebookError> {
 *     let actor = RequireJWT::actor(&req)?;
 *     // ...
 * }
 * ```
 *
 * 用户角色取自存储中的用户记录，而不是令牌里的 role 字段。
 */

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use crate::access::Actor;
use crate::errors::{GradebookError, Result};
use crate::models::users::UserStatus;
use crate::storage::Storage;
use crate::utils::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 access token，返回当前用户
async fn authenticate(req: &ServiceRequest) -> Result<Actor> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| GradebookError::authentication("缺少或无效的 Authorization 头"))?;

    let jwt = req
        .app_data::<web::Data<JwtUtils>>()
        .ok_or_else(|| GradebookError::database_config("JwtUtils 未注册"))?;

    let claims = jwt.verify_access_token(token).map_err(|err| {
        info!("JWT 校验失败: {}", err);
        GradebookError::authentication("令牌无效或已过期")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| GradebookError::authentication("令牌中的用户 ID 无效"))?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| GradebookError::database_config("Storage 未注册"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| GradebookError::authentication("用户不存在"))?;

    if user.status != UserStatus::Active {
        return Err(GradebookError::authentication("用户已被停用"));
    }

    Ok(Actor::new(user.id, user.role))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == Method::OPTIONS {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            match authenticate(&req).await {
                Ok(actor) => {
                    debug!("JWT 认证成功, 用户 ID: {}", actor.id);
                    req.extensions_mut().insert(actor);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    info!("请求 {} 认证失败: {}", req.path(), err);
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出当前用户
    ///
    /// 只能在应用了 RequireJWT 的路由中使用。
    pub fn actor(req: &HttpRequest) -> Result<Actor> {
        req.extensions()
            .get::<Actor>()
            .copied()
            .ok_or_else(|| GradebookError::authentication("未认证的请求"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::UserRole;
    use crate::test_support::{seed_user, storage};
    use actix_web::{App, HttpResponse, http::StatusCode, test};

    async fn whoami(req: HttpRequest) -> std::result::Result<HttpResponse, GradebookError> {
        let actor = RequireJWT::actor(&req)?;
        Ok(HttpResponse::Ok().body(format!("{}:{}", actor.id, actor.role)))
    }

    #[actix_web::test]
    async fn test_bearer_token_yields_actor() {
        let storage = storage().await;
        let teacher = seed_user(&storage, "t1", UserRole::Teacher).await;
        let jwt = JwtUtils::new("test-secret");
        // 令牌中的角色被忽略
        let token = jwt
            .generate_access_token(teacher, "admin", chrono::Duration::minutes(5))
            .unwrap();

        let shared: Arc<dyn Storage> = Arc::new(storage);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(shared))
                .app_data(web::Data::new(jwt))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/me", web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, format!("{teacher}:teacher").as_bytes());

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_unknown_user_is_rejected() {
        let storage = storage().await;
        let jwt = JwtUtils::new("test-secret");
        let token = jwt
            .generate_access_token(4_040, "student", chrono::Duration::minutes(5))
            .unwrap();

        let shared: Arc<dyn Storage> = Arc::new(storage);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(shared))
                .app_data(web::Data::new(jwt))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/me", web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
