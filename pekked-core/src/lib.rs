//! pekked Core Library
//!
//! Client-side orchestration for the pekked name registry:
//! - Session discovery and network gating
//! - Name pricing and the registration workflow
//! - Record edits for owned names
//! - Reading the registered names list
//!
//! The wallet and the registry contract are injected through
//! [`ServiceContext`], so every platform (CLI, tests) shares the same logic.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{ServiceContext, ServiceSettings};
pub use traits::ContextReloader;
