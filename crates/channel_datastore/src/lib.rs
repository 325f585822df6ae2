//! # DataStore Module
//!
//! This module provides functionality for interacting with a Postgres database
//! that durably records discovered YouTube videos and the list of tracked channels.
//!
//! The video record log is append-only and is the single source of truth for
//! duplicate suppression: the in-memory index in `channel_pulse` is rebuilt from
//! it on every startup.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::DataStore;
pub use domain::VideoRecord;
