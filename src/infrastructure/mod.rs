//! Adapters for the domain ports: in-memory and persistent stores, the
//! notification channel and the demo seed data.

pub mod in_memory;
pub mod notifier;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod seed;
