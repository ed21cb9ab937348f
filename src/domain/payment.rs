use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An incoming remittance or tuition payment.
///
/// Only `reference`, `email`, `amount` and `amount_received` take part in
/// validation. The remaining fields describe the sender and destination and
/// are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub reference: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "amount_received")]
    pub amount_received: Option<Decimal>,
    #[serde(default, alias = "sender_full_name")]
    pub sender_full_name: Option<String>,
    #[serde(default, alias = "sender_address")]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default, alias = "country_from")]
    pub country_from: Option<String>,
    #[serde(default, alias = "currency_from")]
    pub currency_from: Option<String>,
    #[serde(default, alias = "student_id")]
    pub student_id: Option<String>,
}

impl PaymentRecord {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_amount_received(mut self, amount_received: Decimal) -> Self {
        self.amount_received = Some(amount_received);
        self
    }

    pub fn with_sender(mut self, full_name: impl Into<String>, address: impl Into<String>) -> Self {
        self.sender_full_name = Some(full_name.into());
        self.sender_address = Some(address.into());
        self
    }

    pub fn with_details(
        mut self,
        country_from: impl Into<String>,
        school: impl Into<String>,
        currency_from: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Self {
        self.country_from = Some(country_from.into());
        self.school = Some(school.into());
        self.currency_from = Some(currency_from.into());
        self.student_id = Some(student_id.into());
        self
    }

    /// Rejects negative `amount` or `amount_received`. Zero and absent
    /// amounts are left to the rules.
    pub fn ensure_non_negative(&self) -> Result<()> {
        for (field, value) in [
            ("amount", self.amount),
            ("amountReceived", self.amount_received),
        ] {
            if let Some(value) = value.filter(|value| *value < Decimal::ZERO) {
                return Err(PaymentError::InvalidAmount(format!(
                    "{field} must not be negative, got {value} for payment {}",
                    self.reference
                )));
            }
        }
        Ok(())
    }
}
