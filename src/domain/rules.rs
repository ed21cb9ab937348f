use super::payment::PaymentRecord;
use super::verdict::{ErrorKind, RuleVerdict};
use crate::error::PaymentError;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Payments above this amount are rejected regardless of currency.
pub const AMOUNT_THRESHOLD: Decimal = dec!(1000000);

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Anything that can judge a payment against its prior history.
///
/// Implemented by [`Rule`] and by the observation wrapper in
/// [`crate::domain::observe`].
pub trait Validate: Send + Sync {
    fn rule(&self) -> Rule;

    fn name(&self) -> &'static str {
        self.rule().name()
    }

    fn validate(&self, payment: &PaymentRecord, history: &[PaymentRecord]) -> RuleVerdict;
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    fn rule(&self) -> Rule {
        (**self).rule()
    }

    fn validate(&self, payment: &PaymentRecord, history: &[PaymentRecord]) -> RuleVerdict {
        (**self).validate(payment, history)
    }
}

/// The fixed set of validation rules.
///
/// Declaration order is the evaluation and reporting order, and `Ord`
/// follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rule {
    EmailValidation,
    DuplicatePayment,
    AmountThreshold,
    PaymentAmount,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::EmailValidation,
        Rule::DuplicatePayment,
        Rule::AmountThreshold,
        Rule::PaymentAmount,
    ];

    /// Stable name used as the aggregation key. External consumers key on
    /// these, so they never change.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::EmailValidation => "EmailValidation",
            Rule::DuplicatePayment => "DuplicatePayment",
            Rule::AmountThreshold => "AmountThreshold",
            Rule::PaymentAmount => "PaymentAmount",
        }
    }

    /// Short registry identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            Rule::EmailValidation => "EMAIL",
            Rule::DuplicatePayment => "DUPLICATE",
            Rule::AmountThreshold => "THRESHOLD",
            Rule::PaymentAmount => "AMOUNT",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = PaymentError;

    /// Accepts the short identifier in any case, or the exact stable name.
    /// Surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.identifier().eq_ignore_ascii_case(s) || rule.name() == s)
            .ok_or_else(|| PaymentError::UnknownRule(s.to_string()))
    }
}

impl Validate for Rule {
    fn rule(&self) -> Rule {
        *self
    }

    fn validate(&self, payment: &PaymentRecord, history: &[PaymentRecord]) -> RuleVerdict {
        match self {
            Rule::EmailValidation => validate_email(payment),
            Rule::DuplicatePayment => validate_duplicate(payment, history),
            Rule::AmountThreshold => validate_threshold(payment),
            Rule::PaymentAmount => validate_amount_match(payment),
        }
    }
}

fn validate_email(payment: &PaymentRecord) -> RuleVerdict {
    let email = match payment.email.as_deref() {
        Some(email) if !email.trim().is_empty() => email,
        _ => return RuleVerdict::fail(ErrorKind::InvalidEmail, "Email cannot be empty"),
    };

    if EMAIL_PATTERN.is_match(email) {
        RuleVerdict::pass("Valid email")
    } else {
        RuleVerdict::fail(ErrorKind::InvalidEmail, "Invalid email format")
    }
}

fn validate_duplicate(payment: &PaymentRecord, history: &[PaymentRecord]) -> RuleVerdict {
    if history.is_empty() {
        return RuleVerdict::pass("No existing payments to check");
    }

    let is_duplicate = payment.email.as_deref().is_some_and(|email| {
        let email = email.to_lowercase();
        history.iter().any(|prior| {
            prior
                .email
                .as_deref()
                .is_some_and(|prior_email| prior_email.to_lowercase() == email)
                && prior.reference != payment.reference
        })
    });

    if is_duplicate {
        RuleVerdict::fail(
            ErrorKind::DuplicatePayment,
            "Duplicate payment found for this email",
        )
    } else {
        RuleVerdict::pass("No duplicate payment")
    }
}

fn validate_threshold(payment: &PaymentRecord) -> RuleVerdict {
    match payment.amount {
        None => RuleVerdict::invalid("Payment amount is required"),
        Some(amount) if amount > AMOUNT_THRESHOLD => RuleVerdict::fail(
            ErrorKind::AmountThresholdExceeded,
            "Amount exceeds maximum threshold of 1,000,000",
        ),
        Some(_) => RuleVerdict::pass("Amount within threshold"),
    }
}

/// Deliberately independent of [`PaymentClassification::classify`]: a missing
/// amount here is an untyped failure, while classification reports `Unknown`.
///
/// [`PaymentClassification::classify`]: super::verdict::PaymentClassification::classify
fn validate_amount_match(payment: &PaymentRecord) -> RuleVerdict {
    let (Some(amount), Some(received)) = (payment.amount, payment.amount_received) else {
        return RuleVerdict::invalid("Invalid payment amounts");
    };

    if amount == received {
        RuleVerdict::pass("Payment amount matches")
    } else if received > amount {
        RuleVerdict::fail(ErrorKind::OverPayment, "Over payment detected")
    } else {
        RuleVerdict::fail(ErrorKind::UnderPayment, "Under payment detected")
    }
}
