use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{AuditEntry, AuditLog, NotificationEvent, Notifier};

enum Event {
    Notify(NotificationEvent),
    Audit(AuditEntry),
    Flush(oneshot::Sender<()>),
}

#[derive(Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// 副作用派发器
///
/// 持有有界队列的发送端，克隆后共享同一个后台任务。
#[derive(Clone)]
pub struct EventDispatcher {
    tx: mpsc::Sender<Event>,
    counters: Arc<Counters>,
}

impl EventDispatcher {
    /// 创建队列并在当前 tokio 运行时中启动后台任务
    pub fn spawn(notifier: Arc<dyn Notifier>, audit: Arc<dyn AuditLog>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let counters = Arc::new(Counters::default());
        tokio::spawn(run_worker(rx, notifier, audit, counters.clone()));
        Self { tx, counters }
    }

    /// 投递通知，不等待结果
    pub fn notify(&self, event: NotificationEvent) {
        self.enqueue(Event::Notify(event));
    }

    /// 投递审计记录，不等待结果
    pub fn audit(&self, entry: AuditEntry) {
        self.enqueue(Event::Audit(entry));
    }

    fn enqueue(&self, event: Event) {
        if let Err(e) = self.tx.try_send(event) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "队列已满",
                mpsc::error::TrySendError::Closed(_) => "队列已关闭",
            };
            warn!(target: "events", "副作用事件被丢弃: {reason}");
        }
    }

    /// 等待此前投递的事件全部处理完毕
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Event::Flush(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// 成功处理的事件数
    pub fn delivered(&self) -> u64 {
        self.counters.delivered.load(Ordering::Relaxed)
    }

    /// 协作者返回失败的事件数
    pub fn failures(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// 因队列满或关闭而丢弃的事件数
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<Event>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditLog>,
    counters: Arc<Counters>,
) {
    while let Some(event) = rx.recv().await {
        let result = match event {
            Event::Notify(event) => notifier
                .notify(&event)
                .await
                .map_err(|e| (event.kind().to_string(), e)),
            Event::Audit(entry) => audit
                .record(&entry)
                .await
                .map_err(|e| (entry.action.as_str().to_string(), e)),
            Event::Flush(ack) => {
                let _ = ack.send(());
                continue;
            }
        };

        match result {
            Ok(()) => {
                counters.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err((what, e)) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(target: "events", event = %what, error = %e, "副作用执行失败");
            }
        }
    }
    debug!(target: "events", "事件派发任务退出");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AuditAction, TracingAuditLog};
    use crate::test_support::{BASE_TS, FailingNotifier, RecordingNotifier, ts};

    fn created(id: i64) -> NotificationEvent {
        NotificationEvent::AssignmentCreated {
            assignment_id: id,
            class_id: 1,
            title: "t".to_string(),
            due_date: ts(BASE_TS),
        }
    }

    #[tokio::test]
    async fn test_events_delivered_in_order() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = EventDispatcher::spawn(notifier.clone(), Arc::new(TracingAuditLog), 8);

        dispatcher.notify(created(1));
        dispatcher.notify(created(2));
        dispatcher.audit(AuditEntry::new(
            AuditAction::AssignmentCreate,
            1,
            serde_json::json!({"assignment_id": 1}),
        ));
        dispatcher.flush().await;

        assert_eq!(notifier.events(), vec![created(1), created(2)]);
        assert_eq!(dispatcher.delivered(), 3);
        assert_eq!(dispatcher.failures(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let dispatcher =
            EventDispatcher::spawn(Arc::new(FailingNotifier), Arc::new(TracingAuditLog), 8);

        dispatcher.notify(created(1));
        dispatcher.notify(created(2));
        dispatcher.flush().await;

        assert_eq!(dispatcher.failures(), 2);
        assert_eq!(dispatcher.delivered(), 0);
    }
}
