use tokio::signal;
use tracing::{error, warn};

use crate::events::EventDispatcher;

pub async fn listen_for_shutdown(events: EventDispatcher) {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");

    // 尽量送出队列中剩余的通知与审计事件
    events.flush().await;
    warn!(
        delivered = events.delivered(),
        failures = events.failures(),
        dropped = events.dropped(),
        "Event queue drained"
    );
}
