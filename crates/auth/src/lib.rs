//! Authentication adapter over a user directory and the session store.
//!
//! - [`directory`] -- the user directory seam and its in-memory mock.
//! - [`provider`] -- the [`AuthProvider`](pressroom_core::provider::AuthProvider)
//!   implementation driving the session lifecycle.

pub mod directory;
pub mod provider;

pub use directory::{DirectoryUser, MemoryUserDirectory, UserDirectory};
pub use provider::DirectoryAuthProvider;
