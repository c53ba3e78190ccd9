//! Domain layer: value objects, entities and the interfaces other layers depend on.

pub mod connection;
pub mod entity;
pub mod error;
pub mod history;
pub mod publisher;
pub mod registry;
pub mod value_object;

pub use connection::{Connection, PusherChannel, PusherInbox};
pub use entity::ChatMessage;
pub use error::{PublishError, RegistryError};
pub use history::MessageHistory;
pub use publisher::MessagePublisher;
pub use registry::ConnectionRegistry;
pub use value_object::{ConnectionId, DisplayTime, OriginHost, Payload};

#[cfg(test)]
pub use history::MockMessageHistory;
#[cfg(test)]
pub use publisher::MockMessagePublisher;
#[cfg(test)]
pub use registry::MockConnectionRegistry;
