use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::trace;

/// A single outbound message to the remote runtime: a stable method name
/// plus positional arguments, conventionally `(client_id, view_id, ...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub method: String,
    pub args: Vec<Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Send-only notification channel toward the remote runtime.
///
/// Delivery is fire-and-forget: `notify` never blocks, never awaits, and
/// never reports failure. None of the supported callbacks carry a value
/// back, so there is no request/response variant of this trait.
pub trait Messenger: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// [`Messenger`] backed by an unbounded in-process channel. The receiving
/// half belongs to whatever task drains notifications into the actual wire
/// codec; if that half is gone the notification is dropped, quietly.
pub struct ChannelMessenger {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelMessenger {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Messenger for ChannelMessenger {
    fn notify(&self, notification: Notification) {
        if let Err(err) = self.sender.send(notification) {
            trace!(target = "bridge", method = %err.0.method, "notification channel closed, dropping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notifications_arrive_in_emission_order() {
        let (messenger, mut receiver) = ChannelMessenger::new();
        messenger.notify(Notification::new("first", vec![json!(1)]));
        messenger.notify(Notification::new("second", vec![json!(2)]));

        assert_eq!(receiver.try_recv().expect("first").method, "first");
        assert_eq!(receiver.try_recv().expect("second").method, "second");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_drops_notifications_without_panicking() {
        let (messenger, receiver) = ChannelMessenger::new();
        drop(receiver);
        messenger.notify(Notification::new("ignored", Vec::new()));
    }
}
