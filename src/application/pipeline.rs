use super::assembler::assemble;
use crate::domain::fee::FeeBreakdown;
use crate::domain::observe::{ValidationHooks, observe};
use crate::domain::payment::PaymentRecord;
use crate::domain::registry::RuleRegistry;
use crate::domain::rules::{Rule, Validate};
use crate::domain::verdict::{AggregateVerdict, PaymentClassification, RuleVerdict};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Which execution mode a caller wants from the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Run every rule and report all of them.
    #[default]
    Full,
    /// Stop at the first failing rule.
    FirstFailure,
}

/// Result of [`ValidationPipeline::first_failure`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortCircuitVerdict {
    /// The first failing rule, or the last rule when every rule passed.
    pub rule: Rule,
    pub verdict: RuleVerdict,
    pub fee: Option<FeeBreakdown>,
    pub classification: PaymentClassification,
}

impl ShortCircuitVerdict {
    /// True when no rule blocked the payment and the amounts match exactly.
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_valid() && self.classification == PaymentClassification::Exact
    }
}

/// Runs the registered rules against a payment.
///
/// Holds no state between runs: the same inputs always produce the same
/// verdict.
pub struct ValidationPipeline {
    rules: Vec<Box<dyn Validate>>,
}

impl ValidationPipeline {
    /// The four registry rules in their fixed order.
    pub fn standard() -> Self {
        let rules = RuleRegistry::global()
            .rules()
            .iter()
            .map(|rule| Box::new(*rule) as Box<dyn Validate>)
            .collect();
        Self { rules }
    }

    /// The standard rules, each wrapped with `hooks`.
    pub fn observed<H: ValidationHooks + 'static>(hooks: H) -> Self {
        let hooks = Arc::new(hooks);
        let rules = RuleRegistry::global()
            .rules()
            .iter()
            .map(|rule| Box::new(observe(*rule, hooks.clone())) as Box<dyn Validate>)
            .collect();
        Self { rules }
    }

    /// Builds a pipeline from arbitrary rules, kept in the given order.
    pub fn from_rules(rules: Vec<Box<dyn Validate>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Evaluates every rule without short-circuiting.
    ///
    /// The fee is computed whenever an amount is present, even for rejected
    /// payments, so callers can show would-be pricing.
    pub fn run(&self, payment: &PaymentRecord, history: &[PaymentRecord]) -> AggregateVerdict {
        let verdicts: BTreeMap<Rule, RuleVerdict> = self
            .rules
            .iter()
            .map(|rule| (rule.rule(), rule.validate(payment, history)))
            .collect();

        assemble(
            verdicts,
            payment.amount.map(FeeBreakdown::calculate),
            PaymentClassification::classify(payment.amount, payment.amount_received),
        )
    }

    /// Evaluates rules in order and stops at the first failure.
    ///
    /// Returns `None` only for a pipeline with no rules.
    pub fn first_failure(
        &self,
        payment: &PaymentRecord,
        history: &[PaymentRecord],
    ) -> Option<ShortCircuitVerdict> {
        let mut last = None;
        for rule in &self.rules {
            let verdict = rule.validate(payment, history);
            let failed = !verdict.is_valid();
            last = Some((rule.rule(), verdict));
            if failed {
                break;
            }
        }

        last.map(|(rule, verdict)| ShortCircuitVerdict {
            rule,
            verdict,
            fee: payment.amount.map(FeeBreakdown::calculate),
            classification: PaymentClassification::classify(
                payment.amount,
                payment.amount_received,
            ),
        })
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
