//! Durable session storage.
//!
//! - [`file`] -- JSON-file-backed store that survives process restarts.
//! - [`memory`] -- in-memory store for tests and ephemeral runs.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
