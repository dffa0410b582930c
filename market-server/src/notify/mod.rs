//! Notification emitters
//!
//! The order pipeline hands every [`Notification`] to a
//! [`NotificationEmitter`] after its transaction commits. Emission is
//! best-effort: the manager logs a failed emit and moves on.

use std::sync::Arc;

use async_trait::async_trait;
use shared::notification::Notification;
use thiserror::Error;

use crate::live::{LiveHub, LiveMessage};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification channel unavailable: {0}")]
    Unavailable(String),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Fire-and-forget delivery of one notification
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn emit(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes every notification to the log
#[derive(Debug, Default, Clone)]
pub struct LogEmitter;

#[async_trait]
impl NotificationEmitter for LogEmitter {
    async fn emit(&self, notification: &Notification) -> Result<(), NotifyError> {
        let request = notification.render();
        tracing::info!(
            user_id = %request.user_id,
            kind = %request.kind,
            priority = ?request.priority,
            related_id = %request.related_id,
            title = %request.title,
            "Notification emitted"
        );
        Ok(())
    }
}

/// Pushes notifications to the recipient's live stream
#[derive(Debug, Clone)]
pub struct LiveEmitter {
    hub: LiveHub,
}

impl LiveEmitter {
    pub fn new(hub: LiveHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl NotificationEmitter for LiveEmitter {
    async fn emit(&self, notification: &Notification) -> Result<(), NotifyError> {
        let request = notification.render();
        let user_id = request.user_id.clone();
        let delivered = self
            .hub
            .publish(&user_id, LiveMessage::Notification(request));
        tracing::debug!(user_id = %user_id, delivered, "Notification pushed to live hub");
        Ok(())
    }
}

/// Emits to every inner emitter; reports the first failure after trying all
#[derive(Clone, Default)]
pub struct FanoutEmitter {
    emitters: Vec<Arc<dyn NotificationEmitter>>,
}

impl std::fmt::Debug for FanoutEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutEmitter")
            .field("emitters", &self.emitters.len())
            .finish()
    }
}

impl FanoutEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, emitter: Arc<dyn NotificationEmitter>) -> Self {
        self.emitters.push(emitter);
        self
    }
}

#[async_trait]
impl NotificationEmitter for FanoutEmitter {
    async fn emit(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut first_error = None;
        for emitter in &self.emitters {
            if let Err(e) = emitter.emit(notification).await
                && first_error.is_none()
            {
                first_error = Some(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Test emitters
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every notification it receives
    #[derive(Default)]
    pub struct RecordingEmitter {
        pub sent: Mutex<Vec<Notification>>,
    }

    impl RecordingEmitter {
        pub fn kinds(&self) -> Vec<&'static str> {
            self.sent.lock().unwrap().iter().map(|n| n.kind()).collect()
        }
    }

    #[async_trait]
    impl NotificationEmitter for RecordingEmitter {
        async fn emit(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    /// Always fails
    pub struct FailingEmitter;

    #[async_trait]
    impl NotificationEmitter for FailingEmitter {
        async fn emit(&self, _notification: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Unavailable("notification service down".to_string()))
        }
    }
}
