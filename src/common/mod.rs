pub mod commands;
pub mod errors;
pub mod events;
pub mod topics;
pub mod types;

pub use commands::RoomCommand;
pub use errors::{PayloadError, RoomError};
pub use events::SubscriberEvent;
pub use types::ReceivedMessage;
