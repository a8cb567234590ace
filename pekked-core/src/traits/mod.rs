//! Abstractions the core calls back into

mod context_reloader;

pub use context_reloader::ContextReloader;
