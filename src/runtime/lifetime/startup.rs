use std::sync::Arc;

use actix_web::web;
use tracing::{debug, warn};

use crate::access::ClassMembershipGate;
use crate::config::{AppConfig, GradingConfig};
use crate::errors::Result;
use crate::events::{EventDispatcher, StorageNotifier, TracingAuditLog};
use crate::services::{
    AssignmentService, GradeService, ReportService, ServiceContext, SubmissionService,
};
use crate::storage::Storage;
use crate::utils::{Clock, JwtUtils, SystemClock};

/// 服务器启动所需的全部共享状态
///
/// 服务以 `web::Data` 的形式持有，工作线程之间共享同一份实例。
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub jwt: web::Data<JwtUtils>,
    pub events: EventDispatcher,
    pub assignments: web::Data<AssignmentService>,
    pub submissions: web::Data<SubmissionService>,
    pub grades: web::Data<GradeService>,
    pub reports: web::Data<ReportService>,
}

impl StartupContext {
    /// 在已有存储与时钟之上组装服务，需要在 tokio 运行时中调用
    pub fn assemble(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        jwt_secret: &str,
        grading: GradingConfig,
    ) -> Self {
        let events = EventDispatcher::spawn(
            Arc::new(StorageNotifier::new(storage.clone(), clock.clone())),
            Arc::new(TracingAuditLog),
            grading.event_buffer,
        );
        let ctx = ServiceContext::new(
            storage.clone(),
            Arc::new(ClassMembershipGate::new(storage.clone())),
            clock,
            events.clone(),
        );

        StartupContext {
            storage,
            jwt: web::Data::new(JwtUtils::new(jwt_secret)),
            events,
            assignments: web::Data::new(AssignmentService::new(ctx.clone())),
            submissions: web::Data::new(SubmissionService::new(ctx.clone())),
            grades: web::Data::new(GradeService::new(ctx.clone(), grading)),
            reports: web::Data::new(ReportService::new(ctx)),
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、事件队列和各业务服务
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let context = StartupContext::assemble(
        storage,
        Arc::new(SystemClock),
        &config.jwt.secret,
        config.grading.clone(),
    );
    debug!(
        buffer = config.grading.event_buffer,
        "Event dispatcher started"
    );

    Ok(context)
}
