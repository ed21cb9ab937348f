use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fee tiers as `(exclusive lower bound, percentage)`, checked top-down.
const FEE_TIERS: [(Decimal, Decimal); 2] = [(dec!(50000), dec!(5.0)), (dec!(30000), dec!(3.0))];
const BASE_FEE_PERCENTAGE: Decimal = dec!(2.0);
const ONE_HUNDRED: Decimal = dec!(100);

/// Transaction fee derived from the requested amount alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub fee_percentage: Decimal,
    pub fee_amount: Decimal,
    pub final_amount: Decimal,
}

impl FeeBreakdown {
    /// Computes the tiered fee for `amount`.
    ///
    /// The fee is rounded half-up to 2 decimal places. The final amount is the
    /// unrounded amount plus the rounded fee.
    pub fn calculate(amount: Decimal) -> Self {
        let fee_percentage = fee_percentage(amount);
        let mut fee_amount = (amount * fee_percentage / ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // pad to cents so the value always renders as e.g. "1200.00"
        fee_amount.rescale(2);

        Self {
            fee_percentage,
            fee_amount,
            final_amount: amount + fee_amount,
        }
    }
}

/// Picks the percentage for `amount`. Bounds are strictly greater-than.
pub fn fee_percentage(amount: Decimal) -> Decimal {
    FEE_TIERS
        .iter()
        .find(|(bound, _)| amount > *bound)
        .map(|(_, percentage)| *percentage)
        .unwrap_or(BASE_FEE_PERCENTAGE)
}
