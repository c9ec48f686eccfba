//! Service Ports
//!
//! Abstract interfaces for external services.

mod chat_completion;

pub use chat_completion::*;
