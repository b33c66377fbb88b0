//! Durability tests for the RocksDB quota store.

use ember_core::constants::TOKEN;
use ember_core::error::EmissionError;
use ember_core::traits::QuotaStore;
use ember_core::types::{Address, QuotaRecord};
use ember_node_lib::storage::{RocksQuotaStore, SCHEMA_VERSION};

fn pool(seed: u8) -> Address {
    Address::from_bytes([seed; 20])
}

fn record(density: u128) -> QuotaRecord {
    QuotaRecord {
        cumulative_density: density,
    }
}

#[test]
fn density_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quota");

    {
        let store = RocksQuotaStore::open(&path).unwrap();
        store.put(&pool(1), &record(240 * TOKEN)).unwrap();
        store.put(&pool(2), &record(7)).unwrap();
        store.flush().unwrap();
    }

    let store = RocksQuotaStore::open(&path).unwrap();
    assert_eq!(store.get(&pool(1)).unwrap(), record(240 * TOKEN));
    assert_eq!(store.get(&pool(2)).unwrap(), record(7));
    assert_eq!(store.pools().unwrap().len(), 2);
}

#[test]
fn overwrite_keeps_latest_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = RocksQuotaStore::open(dir.path().join("quota")).unwrap();

    for density in [40, 80, 120] {
        store.put(&pool(5), &record(density * TOKEN)).unwrap();
    }

    assert_eq!(store.get(&pool(5)).unwrap(), record(120 * TOKEN));
    assert_eq!(store.pools().unwrap().len(), 1);
}

#[test]
fn max_density_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = RocksQuotaStore::open(dir.path().join("quota")).unwrap();
    store.put(&pool(6), &record(u128::MAX)).unwrap();
    assert_eq!(store.get(&pool(6)).unwrap().cumulative_density, u128::MAX);
}

#[test]
fn schema_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quota");

    {
        let store = RocksQuotaStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }

    {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(false);
        let db = rocksdb::DB::open_cf(&opts, &path, ["density", "metadata"]).unwrap();
        let cf = db.cf_handle("metadata").unwrap();
        db.put_cf(&cf, b"schema_version", (SCHEMA_VERSION + 1).to_le_bytes())
            .unwrap();
    }

    match RocksQuotaStore::open(&path) {
        Err(EmissionError::Storage(msg)) => assert!(msg.contains("schema version")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected schema mismatch"),
    }
}
