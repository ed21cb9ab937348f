use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use payment_checks::application::pipeline::{ValidationMode, ValidationPipeline};
use payment_checks::application::service::PaymentService;
use payment_checks::config::AppConfig;
use payment_checks::domain::observe::TracingHooks;
use payment_checks::domain::ports::{PaymentSourceBox, TransactionStoreBox};
use payment_checks::infrastructure::in_memory::InMemoryPaymentStore;
use payment_checks::interfaces::csv::payment_reader::PaymentReader;
use payment_checks::interfaces::csv::verdict_writer::VerdictWriter;
use payment_checks::interfaces::json::JsonLinesWriter;
use payment_checks::telemetry;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payments to validate (CSV)
    input: PathBuf,

    /// Previously accepted payments to check duplicates against (CSV)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Run every rule, or stop at the first failing one
    #[arg(long, value_enum, default_value_t = Mode::Full)]
    mode: Mode,

    /// Output format for verdicts
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Log every rule evaluation (overrides PAYMENT_CHECKS_AUDIT)
    #[arg(long)]
    audit: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Full,
    FirstFailure,
}

impl From<Mode> for ValidationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Full => ValidationMode::Full,
            Mode::FirstFailure => ValidationMode::FirstFailure,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn open_stores(db_path: Option<&Path>) -> Result<(PaymentSourceBox, TransactionStoreBox)> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        use payment_checks::infrastructure::rocksdb::RocksDBStore;

        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let store = InMemoryPaymentStore::new();
    Ok((Box::new(store.clone()), Box::new(store)))
}

fn build_pipeline(audit: bool) -> ValidationPipeline {
    if audit {
        ValidationPipeline::observed(TracingHooks)
    } else {
        ValidationPipeline::standard()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().into_diagnostic()?;
    telemetry::init(&config.log_level).into_diagnostic()?;

    let (source, store) = open_stores(cli.db_path.as_deref())?;
    let service = PaymentService::new(source, store, build_pipeline(cli.audit || config.audit));

    if let Some(history_path) = cli.history {
        let file = File::open(history_path).into_diagnostic()?;
        for payment in PaymentReader::new(file).payments() {
            match payment {
                Ok(payment) => {
                    service.import(payment).await.into_diagnostic()?;
                }
                Err(e) => eprintln!("Error reading history payment: {}", e),
            }
        }
    }

    let mut csv_writer = VerdictWriter::new(io::stdout());
    let mut json_writer = JsonLinesWriter::new(io::stdout());

    let file = File::open(cli.input).into_diagnostic()?;
    for payment in PaymentReader::new(file).payments() {
        let payment = match payment {
            Ok(payment) => payment,
            Err(e) => {
                eprintln!("Error reading payment: {}", e);
                continue;
            }
        };

        let outcome = match service.submit(payment, cli.mode.into()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Error processing payment: {}", e);
                continue;
            }
        };

        match cli.format {
            Format::Csv => csv_writer.write(&outcome).into_diagnostic()?,
            Format::Json => json_writer.write(&outcome).into_diagnostic()?,
        }
    }

    csv_writer.flush().into_diagnostic()?;
    json_writer.flush().into_diagnostic()?;

    Ok(())
}
