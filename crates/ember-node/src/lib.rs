//! # ember-node: Persistent emission node.
//!
//! Composes the emission engine with durable state:
//! - [`storage::RocksQuotaStore`]: per-pool density backed by RocksDB
//! - [`node::EmissionNode`]: distributor wired to the persistent store
//! - [`config::NodeConfig`]: layered file/environment configuration
//! - [`telemetry::init_tracing`]: tracing subscriber setup

pub mod config;
pub mod node;
pub mod storage;
pub mod telemetry;

pub use config::{EmissionSettings, NodeConfig};
pub use node::EmissionNode;
pub use storage::RocksQuotaStore;
