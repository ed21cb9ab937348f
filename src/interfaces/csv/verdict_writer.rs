use crate::application::service::SubmissionOutcome;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Flat CSV row for one submission.
#[derive(Debug, Serialize)]
struct VerdictRow<'a> {
    reference: &'a str,
    accepted: bool,
    classification: String,
    fee_percentage: Option<String>,
    fee_amount: Option<String>,
    final_amount: Option<String>,
    store_reference: Option<&'a str>,
    message: &'a str,
}

impl<'a> From<&'a SubmissionOutcome> for VerdictRow<'a> {
    fn from(outcome: &'a SubmissionOutcome) -> Self {
        let fee = outcome.verdict.fee();
        Self {
            reference: &outcome.reference,
            accepted: outcome.verdict.is_accepted(),
            classification: outcome.verdict.classification().to_string(),
            fee_percentage: fee.map(|fee| fee.fee_percentage.to_string()),
            fee_amount: fee.map(|fee| fee.fee_amount.to_string()),
            final_amount: fee.map(|fee| fee.final_amount.to_string()),
            store_reference: outcome.store_reference.as_deref(),
            message: outcome.verdict.message(),
        }
    }
}

/// Writes submission outcomes as CSV, one row per payment.
pub struct VerdictWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> VerdictWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, outcome: &SubmissionOutcome) -> Result<()> {
        self.writer.serialize(VerdictRow::from(outcome))?;
        Ok(())
    }

    pub fn write_all<'a>(
        &mut self,
        outcomes: impl IntoIterator<Item = &'a SubmissionOutcome>,
    ) -> Result<()> {
        for outcome in outcomes {
            self.write(outcome)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
