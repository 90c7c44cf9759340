use shellchat_core::protocol::Event;

/// Events consumed by the main UI loop.
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// Forwarded event from the session actor.
    SessionEvent(Event),

    /// Request to repaint the UI.
    Redraw,
}
