//! Watch-party synchronization server library.
//!
//! Coordinates viewers watching a shared video in lockstep: an in-memory
//! room registry for playback state and membership, a WebSocket gateway
//! relaying playback and chat events, an ordered chat store, and an HTTP
//! range streamer for local video files.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
