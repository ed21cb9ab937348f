use crate::application::service::SubmissionOutcome;
use crate::error::Result;
use std::io::Write;

/// Writes submission outcomes as JSON Lines, one object per payment.
pub struct JsonLinesWriter<W: Write> {
    sink: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write(&mut self, outcome: &SubmissionOutcome) -> Result<()> {
        serde_json::to_writer(&mut self.sink, outcome)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
