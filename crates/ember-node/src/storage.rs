//! RocksDB-backed quota storage.
//!
//! Implements [`QuotaStore`] with two column families: `density` maps a
//! 20-byte pool address to a bincode-encoded [`QuotaRecord`], and
//! `metadata` holds the on-disk schema version. Writes go through a
//! [`WriteBatch`].

use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use tracing::{debug, info};

use ember_core::error::EmissionError;
use ember_core::traits::QuotaStore;
use ember_core::types::{Address, PoolKey, QuotaRecord};

const CF_DENSITY: &str = "density";
const CF_METADATA: &str = "metadata";

const ALL_CFS: &[&str] = &[CF_DENSITY, CF_METADATA];

const META_SCHEMA_VERSION: &[u8] = b"schema_version";

/// Current on-disk layout version.
pub const SCHEMA_VERSION: u32 = 1;

/// Persistent per-pool density records.
pub struct RocksQuotaStore {
    db: DB,
}

impl RocksQuotaStore {
    /// Open or create the database at `path`.
    ///
    /// A fresh database is stamped with [`SCHEMA_VERSION`]; an existing one
    /// with a different version is rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EmissionError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cf_descriptors)
            .map_err(|e| EmissionError::Storage(e.to_string()))?;
        let store = Self { db };

        match store.schema_version()? {
            None => {
                let cf = store.cf_handle(CF_METADATA)?;
                store
                    .db
                    .put_cf(&cf, META_SCHEMA_VERSION, SCHEMA_VERSION.to_le_bytes())
                    .map_err(|e| EmissionError::Storage(e.to_string()))?;
                info!(path = %path.as_ref().display(), "created quota store");
            }
            Some(SCHEMA_VERSION) => {
                debug!(path = %path.as_ref().display(), "opened quota store");
            }
            Some(other) => {
                return Err(EmissionError::Storage(format!(
                    "unsupported schema version {other}, expected {SCHEMA_VERSION}"
                )));
            }
        }

        Ok(store)
    }

    /// Stored schema version, or `None` for a fresh database.
    pub fn schema_version(&self) -> Result<Option<u32>, EmissionError> {
        let cf = self.cf_handle(CF_METADATA)?;
        match self
            .db
            .get_cf(&cf, META_SCHEMA_VERSION)
            .map_err(|e| EmissionError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    EmissionError::Storage(format!("corrupt schema version: {} bytes", bytes.len()))
                })?;
                Ok(Some(u32::from_le_bytes(raw)))
            }
            None => Ok(None),
        }
    }

    /// Every pool with a stored record, in key order.
    pub fn pools(&self) -> Result<Vec<(PoolKey, QuotaRecord)>, EmissionError> {
        let cf = self.cf_handle(CF_DENSITY)?;
        let mut result = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| EmissionError::Storage(e.to_string()))?;
            let bytes: [u8; 20] = key.as_ref().try_into().map_err(|_| {
                EmissionError::Storage(format!("corrupt pool key: {} bytes", key.len()))
            })?;
            result.push((Address::from_bytes(bytes), Self::decode_record(&value)?));
        }
        Ok(result)
    }

    /// Flush memtables to disk.
    pub fn flush(&self) -> Result<(), EmissionError> {
        for name in ALL_CFS {
            let cf = self.cf_handle(name)?;
            self.db
                .flush_cf(&cf)
                .map_err(|e| EmissionError::Storage(e.to_string()))?;
        }
        Ok(())
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily, EmissionError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| EmissionError::Storage(format!("missing column family: {name}")))
    }

    fn decode_record(bytes: &[u8]) -> Result<QuotaRecord, EmissionError> {
        let (record, _): (QuotaRecord, _) =
            bincode::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| EmissionError::Storage(e.to_string()))?;
        Ok(record)
    }
}

impl QuotaStore for RocksQuotaStore {
    fn get(&self, pool: &PoolKey) -> Result<QuotaRecord, EmissionError> {
        let cf = self.cf_handle(CF_DENSITY)?;
        match self
            .db
            .get_cf(&cf, pool.as_bytes())
            .map_err(|e| EmissionError::Storage(e.to_string()))?
        {
            Some(bytes) => Self::decode_record(&bytes),
            None => Ok(QuotaRecord::default()),
        }
    }

    fn put(&self, pool: &PoolKey, record: &QuotaRecord) -> Result<(), EmissionError> {
        let cf = self.cf_handle(CF_DENSITY)?;
        let value = bincode::encode_to_vec(record, bincode::config::standard())
            .map_err(|e| EmissionError::Storage(e.to_string()))?;
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf, pool.as_bytes(), value);
        self.db
            .write(batch)
            .map_err(|e| EmissionError::Storage(e.to_string()))
    }
}
