use super::types::ReceivedMessage;

/// Events sent from topic handlers up to the UI.
#[derive(Debug, Clone)]
pub enum SubscriberEvent {
    MessageReceived(ReceivedMessage),
}
