//! Persistence, sessions and configuration for Roster.
//!
//! The [`records::RecordStore`] adapter reads and writes whole collections
//! through a [`storage::KeyValueStore`]; a [`session::Session`] binds one
//! screen state to a storage key.
pub mod config;
pub mod records;
pub mod session;
pub mod storage;
