mod behavior;
mod client;
mod room;
mod transport;

pub use room::GossipRoom;
