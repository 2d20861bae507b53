//! CLI command handlers module
//!
//! Organized by functional domain:
//! - serve: API server
//! - rag: ask, search and ingest
//! - wake: backend wake-up
//! - info: configuration display

pub mod info;
pub mod rag;
pub mod serve;
pub mod wake;

pub use info::*;
pub use rag::*;
pub use serve::*;
pub use wake::*;
