//! 业务逻辑层
//!
//! 每个领域一个服务结构体，具体操作放在同名子模块中。
//! 服务只依赖注入进来的 [`ServiceContext`]，不读取全局状态。

pub mod assignments;
pub mod grades;
pub mod reports;
pub mod submissions;

pub use assignments::AssignmentService;
pub use grades::GradeService;
pub use reports::ReportService;
pub use submissions::SubmissionService;

use std::sync::Arc;

use tracing::warn;

use crate::access::{AccessDecision, AccessGate, AccessTarget, Actor, Operation};
use crate::errors::{GradebookError, Result};
use crate::events::EventDispatcher;
use crate::storage::Storage;
use crate::utils::Clock;

/// 服务共享的依赖
#[derive(Clone)]
pub struct ServiceContext {
    pub storage: Arc<dyn Storage>,
    pub gate: Arc<dyn AccessGate>,
    pub clock: Arc<dyn Clock>,
    pub events: EventDispatcher,
}

impl ServiceContext {
    pub fn new(
        storage: Arc<dyn Storage>,
        gate: Arc<dyn AccessGate>,
        clock: Arc<dyn Clock>,
        events: EventDispatcher,
    ) -> Self {
        Self {
            storage,
            gate,
            clock,
            events,
        }
    }

    /// 通过访问检查，拒绝时用 `on_deny` 构造对应的错误
    pub(crate) async fn authorize(
        &self,
        actor: &Actor,
        operation: Operation,
        target: AccessTarget,
        on_deny: fn(String) -> GradebookError,
    ) -> Result<()> {
        match self.gate.check(actor, operation, target).await? {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(reason) => {
                warn!(
                    actor_id = actor.id,
                    role = %actor.role,
                    operation = ?operation,
                    class_id = target.class_id(),
                    %reason,
                    "访问被拒绝"
                );
                Err(on_deny(format!("无权执行该操作: {reason}")))
            }
        }
    }
}
