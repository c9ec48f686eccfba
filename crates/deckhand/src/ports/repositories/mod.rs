//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod conversation_repository;
mod presentation_repository;

pub use conversation_repository::*;
pub use presentation_repository::*;
