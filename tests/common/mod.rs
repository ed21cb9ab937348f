#![allow(dead_code)]

use std::io::Error;
use tempfile::NamedTempFile;

pub const HEADER: [&str; 4] = ["reference", "email", "amount", "amountReceived"];

/// Writes `rows` under the standard payment header to a temp file.
pub fn payments_csv(rows: &[[&str; 4]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_path(file.path())?;
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(file)
}

/// Writes `count` distinct, acceptable payments (unique emails, exact amounts).
pub fn generate_accepted_csv(count: usize) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::Writer::from_path(file.path())?;
    wtr.write_record(HEADER)?;
    for i in 1..=count {
        let amount = format!("{}.00", 1000 + i);
        wtr.write_record([
            format!("R{i}").as_str(),
            format!("payer{i}@example.com").as_str(),
            amount.as_str(),
            amount.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(file)
}
