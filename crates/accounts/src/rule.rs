//! Spending-control rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::transaction::Transaction;
use crate::violation::Violation;

pub const HIGH_FREQUENCY_RULE_NAME: &str = "max transactions in 2 minutes";
pub const HIGH_FREQUENCY_VIOLATION: &str = "high-frequency-small-interval";
pub const HIGH_FREQUENCY_THRESHOLD: i64 = 3;
pub const HIGH_FREQUENCY_WINDOW_MINUTES: i64 = 2;

/// Policy family of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Caps the number of transactions inside the accumulator window.
    UsageLimit,
}

/// A named policy bound to its own accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    kind: RuleKind,
    usage_limit: i64,
    accumulator: Accumulator,
    violation_code: String,
}

impl Rule {
    /// Usage-limit rule with a zeroed accumulator.
    pub fn usage_limit(
        name: impl Into<String>,
        threshold: i64,
        window: Duration,
        violation_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RuleKind::UsageLimit,
            usage_limit: threshold,
            accumulator: Accumulator::zeroed(window),
            violation_code: violation_code.into(),
        }
    }

    /// Rule restored from storage.
    pub fn from_parts(
        name: String,
        kind: RuleKind,
        usage_limit: i64,
        accumulator: Accumulator,
        violation_code: String,
    ) -> Self {
        Self {
            name,
            kind,
            usage_limit,
            accumulator,
            violation_code,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn usage_limit_threshold(&self) -> i64 {
        self.usage_limit
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn violation_code(&self) -> &str {
        &self.violation_code
    }

    /// Resolve window expiry as of `now`.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.accumulator = self.accumulator.refreshed(now);
    }

    /// Count the transaction against this rule and report a violation if
    /// the rule is now breached.
    ///
    /// The spend is recorded whatever the outcome; nothing is rolled back
    /// when the transaction is later refused.
    pub fn evaluate(&mut self, transaction: &Transaction) -> Option<Violation> {
        self.accumulator.add_spend(transaction.amount);

        match self.kind {
            RuleKind::UsageLimit if self.accumulator.period_used() > self.usage_limit => {
                Some(Violation::Rule(self.violation_code.clone()))
            }
            RuleKind::UsageLimit => None,
        }
    }
}

/// Ordered rule set evaluated against every transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpendingControl {
    rules: Vec<Rule>,
}

impl SpendingControl {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rule set every new account starts with: at most three transactions
    /// in any two-minute window.
    pub fn default_rules() -> Self {
        Self::new(vec![Rule::usage_limit(
            HIGH_FREQUENCY_RULE_NAME,
            HIGH_FREQUENCY_THRESHOLD,
            Duration::minutes(HIGH_FREQUENCY_WINDOW_MINUTES),
            HIGH_FREQUENCY_VIOLATION,
        )])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn refresh(&mut self, now: DateTime<Utc>) {
        for rule in &mut self.rules {
            rule.refresh(now);
        }
    }

    /// Evaluate every rule in order, never stopping early.
    pub fn evaluate(&mut self, transaction: &Transaction) -> Vec<Violation> {
        self.rules
            .iter_mut()
            .filter_map(|rule| rule.evaluate(transaction))
            .collect()
    }
}
