//! Application layer containing the validation orchestration.
//!
//! `ValidationPipeline` runs the rules and assembles the verdict. It is pure
//! and synchronous. `PaymentService` is the async caller that loads history
//! from a `PaymentSource` and decides whether to record the payment.

pub mod assembler;
pub mod pipeline;
pub mod service;
