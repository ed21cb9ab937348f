use crate::domain::payment::PaymentRecord;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads payment records from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<PaymentRecord>`.
/// Headers use the camelCase field names (`amountReceived`, `senderFullName`, ...).
/// Whitespace is trimmed, short rows are accepted and empty cells become `None`.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes payments.
    ///
    /// A row with a non-numeric or negative amount yields an `Err` for that
    /// row only.
    pub fn payments(self) -> impl Iterator<Item = Result<PaymentRecord>> {
        self.reader.into_deserialize().map(|result| {
            let payment: PaymentRecord = result.map_err(PaymentError::from)?;
            payment.ensure_non_negative()?;
            Ok(payment)
        })
    }
}
