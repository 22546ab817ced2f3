//! Backend adapters for the gallery ports.
//!
//! The in-memory adapters model the hosted backend's observable contract
//! (provider error codes, pending server timestamps, listener lifetimes) and
//! back the host binary and the integration tests.

pub mod fs;
pub mod memory;
pub mod time;

pub use fs::FsObjectStore;
pub use memory::{InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryObjectStorage};
pub use time::SystemClock;
