use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{
    PaymentSource, StoredTransaction, TransactionStore, format_store_reference,
};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for accepted transactions, keyed by insertion sequence.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for counters.
pub const CF_META: &str = "meta";

const REFERENCE_COUNTER: &[u8] = b"reference_counter";
const RECORD_COUNTER: &[u8] = b"record_counter";

/// A persistent store implementation using RocksDB.
///
/// Accepted transactions live in their own Column Family, keyed by a
/// big-endian insertion counter so iteration returns them oldest first. The
/// counters themselves live in `meta`, which keeps store references
/// sequential across restarts.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    counter_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("transactions" and "meta") exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions, cf_meta])?;

        Ok(Self {
            db: Arc::new(db),
            counter_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    /// Increments the named counter and returns the new value.
    fn bump_counter(&self, key: &[u8]) -> Result<u64> {
        let _guard = self
            .counter_lock
            .lock()
            .map_err(|_| PaymentError::StorageError("counter lock poisoned".to_string()))?;
        let cf = self.cf(CF_META)?;

        let current = match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    PaymentError::StorageError("corrupt counter value".to_string())
                })?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };

        let next = current + 1;
        self.db.put_cf(cf, key, next.to_be_bytes())?;
        Ok(next)
    }
}

#[async_trait]
impl PaymentSource for RocksDBStore {
    async fn history(&self) -> Result<Vec<PaymentRecord>> {
        let cf = self.cf(CF_TRANSACTIONS)?;

        let mut payments = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let transaction: StoredTransaction = serde_json::from_slice(&value)?;
            payments.push(transaction.payment);
        }

        Ok(payments)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn next_reference(&self) -> Result<String> {
        let sequence = self.bump_counter(REFERENCE_COUNTER)?;
        Ok(format_store_reference(sequence))
    }

    async fn record(&self, transaction: StoredTransaction) -> Result<()> {
        let key = self.bump_counter(RECORD_COUNTER)?.to_be_bytes();
        let value = serde_json::to_vec(&transaction)?;

        let cf = self.cf(CF_TRANSACTIONS)?;
        self.db.put_cf(cf, key, value)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::FeeBreakdown;
    use crate::domain::verdict::PaymentClassification;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn stored(store_reference: String, reference: &str) -> StoredTransaction {
        let payment = PaymentRecord::new(reference)
            .with_email("a@b.com")
            .with_amount(dec!(100.00))
            .with_amount_received(dec!(100.00));
        StoredTransaction {
            store_reference,
            fee: payment.amount.map(FeeBreakdown::calculate),
            payment,
            classification: PaymentClassification::Exact,
        }
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_TRANSACTIONS).is_some());
        assert!(store.db.cf_handle(CF_META).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_history_order() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        for reference in ["R1", "R2", "R3"] {
            let store_reference = store.next_reference().await.unwrap();
            store.record(stored(store_reference, reference)).await.unwrap();
        }

        let history = store.history().await.unwrap();
        let references: Vec<&str> = history.iter().map(|p| p.reference.as_str()).collect();
        assert_eq!(references, ["R1", "R2", "R3"]);
        assert_eq!(history[0].amount, Some(dec!(100.00)));
    }

    #[tokio::test]
    async fn test_rocksdb_references_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            assert_eq!(store.next_reference().await.unwrap(), "REF001");
            assert_eq!(store.next_reference().await.unwrap(), "REF002");
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.next_reference().await.unwrap(), "REF003");
    }
}
