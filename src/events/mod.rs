//! 通知与审计的异步派发
//!
//! 主操作只负责把事件放进有界队列，由后台任务调用外部协作者；
//! 协作者的失败只记录日志并计数，不会回传给调用方。

mod audit;
mod dispatcher;
mod notifier;

pub use audit::{AuditAction, AuditEntry, AuditLog, TracingAuditLog};
pub use dispatcher::EventDispatcher;
pub use notifier::{NotificationEvent, Notifier, StorageNotifier};
