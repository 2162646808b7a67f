use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use utils::AppResult;

/// Inline button attached to a notification. The callback payload is an
/// opaque `verb_entityid` string the gateway hands back on button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyAction {
    pub label: String,
    pub callback: String,
}

impl NotifyAction {
    pub fn new(label: &str, callback: String) -> Self {
        Self {
            label: label.to_string(),
            callback,
        }
    }
}

/// Outbound boundary to the messaging gateway. Always called after the state
/// change committed; implementations must not assume delivery.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, chat_id: i64, text: &str, actions: &[NotifyAction]) -> AppResult<()>;
}

pub type DynNotifier = Arc<dyn Notifier + Send + Sync>;

/// Default sink for headless runs and tests.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _chat_id: i64, _text: &str, _actions: &[NotifyAction]) -> AppResult<()> {
        Ok(())
    }
}

/// Shared, swappable notifier slot. The bot registers itself here after the
/// services are built (the gateway depends on the services, not the other
/// way around).
#[derive(Clone)]
pub struct NotifierHandle {
    inner: Arc<RwLock<DynNotifier>>,
}

impl NotifierHandle {
    pub fn noop() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(NoopNotifier) as DynNotifier)),
        }
    }

    pub async fn set(&self, notifier: DynNotifier) {
        *self.inner.write().await = notifier;
    }

    /// Fire-and-forget delivery: failures are logged and swallowed so a slow
    /// or broken gateway can never roll back a committed state change.
    pub async fn notify_best_effort(&self, chat_id: i64, text: String, actions: Vec<NotifyAction>) {
        let notifier = self.inner.read().await.clone();
        if let Err(e) = notifier.notify(chat_id, &text, &actions).await {
            warn!("⚠️ notification to {} failed (ignored): {}", chat_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNotifier {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _chat_id: i64, _text: &str, _actions: &[NotifyAction]) -> AppResult<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _chat_id: i64, _text: &str, _actions: &[NotifyAction]) -> AppResult<()> {
            Err(utils::AppError::InternalServerErrorWithContext(
                "gateway down".to_string(),
            ))
        }
    }

    #[tokio::test]
    async fn test_handle_swaps_notifier() {
        let handle = NotifierHandle::noop();
        let counting = Arc::new(CountingNotifier {
            sent: AtomicUsize::new(0),
        });

        handle.set(counting.clone()).await;
        handle.notify_best_effort(1001, "hola".to_string(), vec![]).await;

        assert_eq!(counting.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let handle = NotifierHandle::noop();
        handle.set(Arc::new(FailingNotifier)).await;

        // Must not panic or propagate: the state change already committed.
        handle.notify_best_effort(1001, "hola".to_string(), vec![]).await;
    }

    #[test]
    fn test_action_holds_callback_payload() {
        let action = NotifyAction::new("✅ Aceptar", format!("approve_interaction_{}", "abc123"));
        assert_eq!(action.label, "✅ Aceptar");
        assert_eq!(action.callback, "approve_interaction_abc123");
    }
}
