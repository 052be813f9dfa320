//! Reconciliation of payment-processor fee pairs
//!
//! Some statements carry a gross transfer twice (an inflow and its mirrored
//! outflow) next to the smaller net amount that actually settled. The engine
//! drops the mirrored pair and records the gap as a fee on the net entry.
//!
//! Matching is a pure pass over a fixed ordering producing a
//! [`ReconciliationPlan`]; the plan is then applied once, so the same input
//! order always yields the same result.

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use std::collections::BTreeSet;

use crate::config::ReconcileConfig;
use crate::types::*;
use crate::utils::numeric::percentage_difference;
use crate::utils::similarity::compare_strings;

/// A gross inflow, its mirrored outflow and the net entry that bears the fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub inflow: usize,
    pub mirror: usize,
    pub fee_bearing: usize,
}

/// Fee to record on one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct FeeAttribution {
    pub index: usize,
    pub fee_amount: BigDecimal,
    pub fee_percentage: f64,
}

/// Outcome of the matching pass, expressed in indices of the scanned slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    pub matches: Vec<MatchedPair>,
    pub fees: Vec<FeeAttribution>,
    pub removals: BTreeSet<usize>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Reconciled transactions together with what was taken out
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationOutcome {
    pub transactions: Vec<Transaction>,
    pub removed: Vec<Transaction>,
    pub matches: Vec<MatchedPair>,
}

pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn magnitude(value: &BigDecimal) -> f64 {
    value.abs().to_f64().unwrap_or(f64::INFINITY)
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    fn is_same_event(&self, left: &Transaction, right: &Transaction) -> bool {
        compare_strings(&left.description, &right.description) >= self.config.confidence
    }

    /// First entry from `start` onwards that exactly negates `transactions[start]`
    pub fn find_mirrored(&self, transactions: &[Transaction], start: usize) -> Option<usize> {
        let reference = transactions.get(start)?;
        let negated = -&reference.credit;

        (start..transactions.len()).find(|&i| {
            let candidate = &transactions[i];
            !candidate.is_total()
                && candidate.credit == negated
                && self.is_same_event(candidate, reference)
        })
    }

    /// Nearest entry before `start` that looks like `transactions[start]` net of a fee
    pub fn find_fee_bearing(&self, transactions: &[Transaction], start: usize) -> Option<usize> {
        let reference = transactions.get(start)?;
        let gross = reference.credit.abs();

        (0..start).rev().find(|&i| {
            let candidate = &transactions[i];
            if candidate.is_total() || candidate.credit.abs() >= gross {
                return false;
            }
            let gap = percentage_difference(magnitude(&reference.credit), magnitude(&candidate.credit));
            gap <= self.config.max_fee_percentage && self.is_same_event(candidate, reference)
        })
    }

    /// Find every fee pair in `transactions` without modifying anything
    pub fn plan(&self, transactions: &[Transaction]) -> ReconciliationPlan {
        let mut plan = ReconciliationPlan::default();
        let zero = BigDecimal::from(0);

        for (i, transaction) in transactions.iter().enumerate() {
            if transaction.is_total() || transaction.credit <= zero {
                continue;
            }

            let Some(mirror) = self.find_mirrored(transactions, i) else {
                continue;
            };

            let Some(fee_bearing) = self.find_fee_bearing(transactions, i) else {
                continue;
            };

            let net = &transactions[fee_bearing];
            let fee_amount = transaction.credit.abs() - net.credit.abs();
            let fee_percentage =
                percentage_difference(magnitude(&transaction.credit), magnitude(&net.credit));

            log::trace!(
                "Matched inflow {} ({}) with mirror {} and fee-bearing {} (fee {})",
                transaction.unique_id,
                transaction.credit,
                transactions[mirror].unique_id,
                net.unique_id,
                fee_amount
            );

            plan.fees.push(FeeAttribution {
                index: fee_bearing,
                fee_amount,
                fee_percentage,
            });
            plan.removals.insert(i);
            plan.removals.insert(mirror);
            plan.matches.push(MatchedPair {
                inflow: i,
                mirror,
                fee_bearing,
            });
        }

        plan
    }

    /// Apply a plan computed over exactly this sequence
    pub fn apply(plan: ReconciliationPlan, transactions: Vec<Transaction>) -> ReconciliationOutcome {
        let mut transactions = transactions;

        for fee in plan.fees {
            if let Some(transaction) = transactions.get_mut(fee.index) {
                transaction.fee_amount = fee.fee_amount;
                transaction.fee_percentage = fee.fee_percentage;
            }
        }

        let (removed, kept): (Vec<_>, Vec<_>) = transactions
            .into_iter()
            .enumerate()
            .partition(|(i, _)| plan.removals.contains(i));

        ReconciliationOutcome {
            transactions: kept.into_iter().map(|(_, t)| t).collect(),
            removed: removed.into_iter().map(|(_, t)| t).collect(),
            matches: plan.matches,
        }
    }

    /// Plan and apply in one step
    pub fn reconcile(&self, transactions: Vec<Transaction>) -> ReconciliationOutcome {
        let plan = self.plan(&transactions);
        let outcome = Self::apply(plan, transactions);

        log::info!(
            "Reconciliation removed {} mirrored entries and attributed {} fees",
            outcome.removed.len(),
            outcome.matches.len()
        );

        outcome
    }
}
