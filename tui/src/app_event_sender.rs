use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::app_event::AppEvent;

/// Cloneable handle for pushing events into the UI loop.
#[derive(Clone)]
pub(crate) struct AppEventSender {
    app_event_tx: UnboundedSender<AppEvent>,
}

impl AppEventSender {
    pub(crate) fn new(app_event_tx: UnboundedSender<AppEvent>) -> Self {
        Self { app_event_tx }
    }

    /// Send an event to the app loop. A send failure means the loop has
    /// already exited, so the event is logged and dropped.
    pub(crate) fn send(&self, event: AppEvent) {
        if let Err(e) = self.app_event_tx.send(event) {
            error!("failed to send event: {e}");
        }
    }
}
