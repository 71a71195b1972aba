//! Store implementations.
//!
//! In-memory implementations of the domain's store traits. A DBMS-backed
//! chat store would slot in behind the same [`crate::domain::ChatStore`]
//! trait without touching the usecase layer.

pub mod inmemory;

pub use inmemory::{InMemoryChatStore, InMemoryRoomStore};
