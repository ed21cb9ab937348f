use super::rules::Rule;
use crate::error::{PaymentError, Result};
use std::sync::LazyLock;

static GLOBAL: LazyLock<RuleRegistry> = LazyLock::new(RuleRegistry::new);

/// Process-wide set of validation rules.
///
/// Populated once with the four rules and never written again, so shared
/// reads need no synchronization.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    fn new() -> Self {
        Self {
            rules: Rule::ALL.to_vec(),
        }
    }

    pub fn global() -> &'static RuleRegistry {
        &GLOBAL
    }

    /// Resolves a short identifier (`EMAIL`, `DUPLICATE`, `THRESHOLD`,
    /// `AMOUNT`, any case) or a stable rule name.
    pub fn get(&self, identifier: &str) -> Result<&Rule> {
        let wanted: Rule = identifier.parse()?;
        self.rules
            .iter()
            .find(|rule| **rule == wanted)
            .ok_or_else(|| PaymentError::UnknownRule(identifier.to_string()))
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_holds_four_rules_in_order() {
        let names: Vec<&str> = RuleRegistry::global()
            .rules()
            .iter()
            .map(Rule::name)
            .collect();
        assert_eq!(
            names,
            ["EmailValidation", "DuplicatePayment", "AmountThreshold", "PaymentAmount"]
        );
    }

    #[test]
    fn test_lookup_by_identifier() {
        let registry = RuleRegistry::global();
        assert_eq!(registry.get("DUPLICATE").unwrap(), &Rule::DuplicatePayment);
        assert_eq!(registry.get("amount").unwrap(), &Rule::PaymentAmount);
        assert_eq!(registry.get("EmailValidation").unwrap(), &Rule::EmailValidation);
    }

    #[test]
    fn test_unknown_rule() {
        let err = RuleRegistry::global().get("SANCTIONS").unwrap_err();
        assert!(matches!(err, PaymentError::UnknownRule(ref id) if id == "SANCTIONS"));
        assert_eq!(err.to_string(), "unknown rule type: SANCTIONS");
    }

    #[test]
    fn test_concurrent_reads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| RuleRegistry::global().get("threshold").map(|r| *r)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), Rule::AmountThreshold);
        }
    }
}
