//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod collected_data;
mod conversation_status;
mod startup_field;

pub use collected_data::*;
pub use conversation_status::*;
pub use startup_field::*;
