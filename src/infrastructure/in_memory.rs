use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{
    PaymentSource, StoredTransaction, TransactionStore, format_store_reference,
};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for accepted payments.
///
/// Serves as both the [`PaymentSource`] and the [`TransactionStore`]: every
/// recorded transaction becomes history for later submissions. Clones share
/// the same underlying data.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    transactions: Arc<RwLock<Vec<StoredTransaction>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded transactions in insertion order.
    pub async fn transactions(&self) -> Vec<StoredTransaction> {
        self.transactions.read().await.clone()
    }
}

#[async_trait]
impl PaymentSource for InMemoryPaymentStore {
    async fn history(&self) -> Result<Vec<PaymentRecord>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.iter().map(|tx| tx.payment.clone()).collect())
    }
}

#[async_trait]
impl TransactionStore for InMemoryPaymentStore {
    async fn next_reference(&self) -> Result<String> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format_store_reference(sequence))
    }

    async fn record(&self, transaction: StoredTransaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.push(transaction);
        Ok(())
    }
}
