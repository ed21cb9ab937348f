pub mod payment_reader;
pub mod verdict_writer;
