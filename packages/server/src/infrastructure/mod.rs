//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod dto;
pub mod history;
pub mod hub;
pub mod registry;
