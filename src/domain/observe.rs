//! Observation wrapper for rules.
//!
//! [`observe`] decorates any [`Validate`] with [`ValidationHooks`]. The hooks
//! see the payment reference, the rule name and the verdict message, but they
//! cannot change the verdict and their errors are dropped after being logged.

use super::payment::PaymentRecord;
use super::rules::{Rule, Validate};
use super::verdict::RuleVerdict;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an observation hook. Never leaves the wrapper.
#[derive(Error, Debug)]
#[error("hook '{hook}' failed: {reason}")]
pub struct HookError {
    pub hook: &'static str,
    pub reason: String,
}

pub type HookResult = std::result::Result<(), HookError>;

/// Callbacks invoked around a rule evaluation. All default to no-ops.
pub trait ValidationHooks: Send + Sync {
    fn before_validate(&self, _reference: &str, _rule: &str) -> HookResult {
        Ok(())
    }

    fn after_pass(&self, _reference: &str, _rule: &str, _message: &str) -> HookResult {
        Ok(())
    }

    fn after_fail(&self, _reference: &str, _rule: &str, _message: &str) -> HookResult {
        Ok(())
    }
}

impl<H: ValidationHooks + ?Sized> ValidationHooks for Arc<H> {
    fn before_validate(&self, reference: &str, rule: &str) -> HookResult {
        (**self).before_validate(reference, rule)
    }

    fn after_pass(&self, reference: &str, rule: &str, message: &str) -> HookResult {
        (**self).after_pass(reference, rule, message)
    }

    fn after_fail(&self, reference: &str, rule: &str, message: &str) -> HookResult {
        (**self).after_fail(reference, rule, message)
    }
}

/// Audit hooks that write each evaluation to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl ValidationHooks for TracingHooks {
    fn before_validate(&self, reference: &str, rule: &str) -> HookResult {
        tracing::info!(rule, reference, "starting validation");
        Ok(())
    }

    fn after_pass(&self, reference: &str, rule: &str, _message: &str) -> HookResult {
        tracing::info!(rule, reference, "validation passed");
        Ok(())
    }

    fn after_fail(&self, reference: &str, rule: &str, message: &str) -> HookResult {
        tracing::warn!(rule, reference, message, "validation failed");
        Ok(())
    }
}

/// A rule decorated with observation hooks.
#[derive(Debug, Clone)]
pub struct Observed<V, H> {
    inner: V,
    hooks: H,
}

/// Wraps `rule` so `hooks` fire around every evaluation. Wrapping an
/// already-observed rule nests the hooks: the outer `before_validate` runs
/// first and the inner `after_*` runs first.
pub fn observe<V: Validate, H: ValidationHooks>(rule: V, hooks: H) -> Observed<V, H> {
    Observed { inner: rule, hooks }
}

fn swallow(result: HookResult) {
    if let Err(err) = result {
        tracing::debug!(error = %err, "ignoring validation hook failure");
    }
}

impl<V: Validate, H: ValidationHooks> Validate for Observed<V, H> {
    fn rule(&self) -> Rule {
        self.inner.rule()
    }

    fn validate(&self, payment: &PaymentRecord, history: &[PaymentRecord]) -> RuleVerdict {
        let name = self.name();
        swallow(self.hooks.before_validate(&payment.reference, name));

        let verdict = self.inner.validate(payment, history);

        if verdict.is_valid() {
            swallow(self.hooks.after_pass(&payment.reference, name, verdict.message()));
        } else {
            swallow(self.hooks.after_fail(&payment.reference, name, verdict.message()));
        }

        verdict
    }
}
