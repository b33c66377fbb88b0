//! Integration test suite for the Ember emission engine.
//!
//! Tests here drive the full distributor against in-memory token and pool
//! registry doubles, and the persistent node against a temporary RocksDB.

pub mod helpers;
