use super::fee::FeeBreakdown;
use super::payment::PaymentRecord;
use super::verdict::PaymentClassification;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An accepted payment as written by a [`TransactionStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransaction {
    /// Sequential reference issued by the store, e.g. `REF001`.
    pub store_reference: String,
    pub payment: PaymentRecord,
    pub fee: Option<FeeBreakdown>,
    pub classification: PaymentClassification,
}

/// Formats a store sequence number as `REF` plus at least three digits.
pub fn format_store_reference(sequence: u64) -> String {
    format!("REF{sequence:03}")
}

/// Read-only view of previously accepted payments, oldest first.
#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn history(&self) -> Result<Vec<PaymentRecord>>;
}

/// Durable record of accepted transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn next_reference(&self) -> Result<String>;
    async fn record(&self, transaction: StoredTransaction) -> Result<()>;
}

pub type PaymentSourceBox = Box<dyn PaymentSource>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type TransactionStoreFactory = Box<dyn Fn() -> TransactionStoreBox + Send + Sync>;
