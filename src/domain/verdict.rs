use super::fee::FeeBreakdown;
use super::rules::Rule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Typed reason attached to a failing rule verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[default]
    None,
    InvalidEmail,
    DuplicatePayment,
    AmountThresholdExceeded,
    OverPayment,
    UnderPayment,
}

/// Outcome of a single rule.
///
/// Built only through [`RuleVerdict::pass`], [`RuleVerdict::fail`] and
/// [`RuleVerdict::invalid`], so a passing verdict always carries
/// `ErrorKind::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleVerdict {
    valid: bool,
    error_kind: ErrorKind,
    message: String,
}

impl RuleVerdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            error_kind: ErrorKind::None,
            message: message.into(),
        }
    }

    pub fn fail(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error_kind,
            message: message.into(),
        }
    }

    /// A failure without a specific reason, e.g. a required field is absent.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::fail(ErrorKind::None, message)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How the received amount relates to the requested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentClassification {
    Exact,
    Overpayment,
    Underpayment,
    Unknown,
}

impl PaymentClassification {
    /// Classifies directly from the two amounts. Either side missing yields
    /// `Unknown`.
    pub fn classify(amount: Option<Decimal>, amount_received: Option<Decimal>) -> Self {
        match (amount, amount_received) {
            (Some(amount), Some(received)) if received == amount => Self::Exact,
            (Some(amount), Some(received)) if received > amount => Self::Overpayment,
            (Some(_), Some(_)) => Self::Underpayment,
            _ => Self::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Exact => "Payment matches expected amount",
            Self::Overpayment => "Payment exceeds expected amount",
            Self::Underpayment => "Payment is below expected amount",
            Self::Unknown => "Payment amounts are incomplete",
        }
    }
}

impl fmt::Display for PaymentClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Exact => "EXACT",
            Self::Overpayment => "OVERPAYMENT",
            Self::Underpayment => "UNDERPAYMENT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Combined result of every rule, the fee and the classification for one
/// payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateVerdict {
    pub(crate) verdicts: BTreeMap<Rule, RuleVerdict>,
    pub(crate) fee: Option<FeeBreakdown>,
    pub(crate) classification: PaymentClassification,
    pub(crate) accepted: bool,
    pub(crate) message: String,
}

impl AggregateVerdict {
    /// Per-rule verdicts, iterated in the fixed rule order.
    pub fn verdicts(&self) -> &BTreeMap<Rule, RuleVerdict> {
        &self.verdicts
    }

    pub fn verdict(&self, rule: Rule) -> Option<&RuleVerdict> {
        self.verdicts.get(&rule)
    }

    /// Looks a verdict up by its stable rule name, e.g. `"EmailValidation"`.
    pub fn verdict_by_name(&self, name: &str) -> Option<&RuleVerdict> {
        self.verdicts
            .iter()
            .find(|(rule, _)| rule.name() == name)
            .map(|(_, verdict)| verdict)
    }

    /// `None` only when the payment carries no amount.
    pub fn fee(&self) -> Option<&FeeBreakdown> {
        self.fee.as_ref()
    }

    pub fn classification(&self) -> PaymentClassification {
        self.classification
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
