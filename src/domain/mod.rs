//! Domain layer: payment records, the validation rules, the fee calculator
//! and the verdict types, plus the ports the application layer talks to.

pub mod fee;
pub mod observe;
pub mod payment;
pub mod ports;
pub mod registry;
pub mod rules;
pub mod verdict;
