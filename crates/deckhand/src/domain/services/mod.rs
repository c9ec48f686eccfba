//! Domain Services
//!
//! Stateless domain logic: completeness scoring, the tool-call protocol
//! adapter, reply post-processing and prompt construction.

pub mod completeness;
mod prompts;
mod suggestions;
mod tool_calls;

pub use completeness::{
    completeness_of, is_ready, meets_threshold, missing_fields, READINESS_THRESHOLD,
};
pub use prompts::*;
pub use suggestions::*;
pub use tool_calls::*;
