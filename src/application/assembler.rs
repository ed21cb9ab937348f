use crate::domain::fee::FeeBreakdown;
use crate::domain::rules::Rule;
use crate::domain::verdict::{AggregateVerdict, PaymentClassification, RuleVerdict};
use std::collections::BTreeMap;

const ALL_PASSED: &str = "All checks passed";

/// Folds per-rule verdicts, the fee and the classification into one
/// [`AggregateVerdict`].
///
/// The payment is accepted only when every rule passed and the amounts match
/// exactly.
pub fn assemble(
    verdicts: BTreeMap<Rule, RuleVerdict>,
    fee: Option<FeeBreakdown>,
    classification: PaymentClassification,
) -> AggregateVerdict {
    let accepted = verdicts.values().all(RuleVerdict::is_valid)
        && classification == PaymentClassification::Exact;
    let message = summarize(&verdicts, classification);

    AggregateVerdict {
        verdicts,
        fee,
        classification,
        accepted,
        message,
    }
}

fn summarize(
    verdicts: &BTreeMap<Rule, RuleVerdict>,
    classification: PaymentClassification,
) -> String {
    let mut message = String::new();

    // BTreeMap iteration follows the fixed rule order
    for verdict in verdicts.values().filter(|verdict| !verdict.is_valid()) {
        message.push_str(verdict.message());
        message.push_str(". ");
    }

    if classification != PaymentClassification::Exact {
        message.push_str(classification.description());
        message.push_str(". ");
    }

    let message = message.trim_end();
    if message.is_empty() {
        ALL_PASSED.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::ErrorKind;

    fn all_passing() -> BTreeMap<Rule, RuleVerdict> {
        Rule::ALL
            .into_iter()
            .map(|rule| (rule, RuleVerdict::pass("ok")))
            .collect()
    }

    #[test]
    fn test_all_passed() {
        let verdict = assemble(all_passing(), None, PaymentClassification::Exact);
        assert!(verdict.is_accepted());
        assert_eq!(verdict.message(), "All checks passed");
    }

    #[test]
    fn test_failures_in_rule_order_then_classification() {
        let mut verdicts = all_passing();
        // insert out of order on purpose
        verdicts.insert(
            Rule::PaymentAmount,
            RuleVerdict::fail(ErrorKind::OverPayment, "Over payment detected"),
        );
        verdicts.insert(
            Rule::EmailValidation,
            RuleVerdict::fail(ErrorKind::InvalidEmail, "Invalid email format"),
        );

        let verdict = assemble(verdicts, None, PaymentClassification::Overpayment);
        assert!(!verdict.is_accepted());
        assert_eq!(
            verdict.message(),
            "Invalid email format. Over payment detected. Payment exceeds expected amount."
        );
    }

    #[test]
    fn test_non_exact_classification_alone_rejects() {
        let verdict = assemble(all_passing(), None, PaymentClassification::Unknown);
        assert!(!verdict.is_accepted());
        assert_eq!(verdict.message(), "Payment amounts are incomplete.");
    }
}
