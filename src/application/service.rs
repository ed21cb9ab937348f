use super::pipeline::{ShortCircuitVerdict, ValidationMode, ValidationPipeline};
use crate::domain::fee::FeeBreakdown;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentSourceBox, StoredTransaction, TransactionStoreBox};
use crate::domain::verdict::{AggregateVerdict, PaymentClassification};
use crate::error::Result;
use serde::Serialize;

/// Verdict produced by one submission, in whichever mode was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubmissionVerdict {
    Full(AggregateVerdict),
    FirstFailure(ShortCircuitVerdict),
}

impl SubmissionVerdict {
    pub fn is_accepted(&self) -> bool {
        match self {
            SubmissionVerdict::Full(verdict) => verdict.is_accepted(),
            SubmissionVerdict::FirstFailure(verdict) => verdict.is_accepted(),
        }
    }

    pub fn fee(&self) -> Option<&FeeBreakdown> {
        match self {
            SubmissionVerdict::Full(verdict) => verdict.fee(),
            SubmissionVerdict::FirstFailure(verdict) => verdict.fee.as_ref(),
        }
    }

    pub fn classification(&self) -> PaymentClassification {
        match self {
            SubmissionVerdict::Full(verdict) => verdict.classification(),
            SubmissionVerdict::FirstFailure(verdict) => verdict.classification,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionVerdict::Full(verdict) => verdict.message(),
            SubmissionVerdict::FirstFailure(verdict) => verdict.verdict.message(),
        }
    }
}

/// Outcome of [`PaymentService::submit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub reference: String,
    pub verdict: SubmissionVerdict,
    /// Set only when the payment was accepted and recorded.
    pub store_reference: Option<String>,
}

/// Validates payments against the accepted history and records the ones that
/// pass.
///
/// The pipeline itself never touches storage; this service owns that
/// decision.
pub struct PaymentService {
    source: PaymentSourceBox,
    store: TransactionStoreBox,
    pipeline: ValidationPipeline,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `source` - Supplies previously accepted payments for duplicate checks.
    /// * `store` - Records accepted payments and issues store references.
    /// * `pipeline` - The rules to run.
    pub fn new(
        source: PaymentSourceBox,
        store: TransactionStoreBox,
        pipeline: ValidationPipeline,
    ) -> Self {
        Self {
            source,
            store,
            pipeline,
        }
    }

    /// Previously accepted payments, oldest first.
    pub async fn history(&self) -> Result<Vec<PaymentRecord>> {
        self.source.history().await
    }

    /// Runs every rule against the current history without recording anything.
    ///
    /// Fails with `InvalidAmount` for negative amounts.
    pub async fn validate(&self, payment: &PaymentRecord) -> Result<AggregateVerdict> {
        payment.ensure_non_negative()?;
        let history = self.source.history().await?;
        Ok(self.pipeline.run(payment, &history))
    }

    /// Records an already-accepted payment without validating it, e.g. when
    /// loading history exported from another system.
    pub async fn import(&self, payment: PaymentRecord) -> Result<String> {
        payment.ensure_non_negative()?;
        let store_reference = self.store.next_reference().await?;
        let fee = payment.amount.map(FeeBreakdown::calculate);
        let classification =
            PaymentClassification::classify(payment.amount, payment.amount_received);
        self.store
            .record(StoredTransaction {
                store_reference: store_reference.clone(),
                payment,
                fee,
                classification,
            })
            .await?;
        Ok(store_reference)
    }

    /// Validates `payment` and records it when accepted.
    pub async fn submit(
        &self,
        payment: PaymentRecord,
        mode: ValidationMode,
    ) -> Result<SubmissionOutcome> {
        payment.ensure_non_negative()?;
        let history = self.source.history().await?;

        let verdict = match mode {
            ValidationMode::Full => SubmissionVerdict::Full(self.pipeline.run(&payment, &history)),
            ValidationMode::FirstFailure => match self.pipeline.first_failure(&payment, &history) {
                Some(verdict) => SubmissionVerdict::FirstFailure(verdict),
                // no rules configured: fall back to the aggregate form
                None => SubmissionVerdict::Full(self.pipeline.run(&payment, &history)),
            },
        };

        let store_reference = if verdict.is_accepted() {
            let store_reference = self.store.next_reference().await?;
            self.store
                .record(StoredTransaction {
                    store_reference: store_reference.clone(),
                    payment: payment.clone(),
                    fee: verdict.fee().copied(),
                    classification: verdict.classification(),
                })
                .await?;
            tracing::info!(
                reference = %payment.reference,
                store_reference = %store_reference,
                "payment accepted"
            );
            Some(store_reference)
        } else {
            tracing::info!(
                reference = %payment.reference,
                reason = verdict.message(),
                "payment rejected"
            );
            None
        };

        Ok(SubmissionOutcome {
            reference: payment.reference,
            verdict,
            store_reference,
        })
    }
}
