//! Utilities shared by the Hearth server and client.

pub mod logger;
pub mod time;
