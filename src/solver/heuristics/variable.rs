//! Strategies for choosing which decision variable to branch on next.

use crate::solver::{engine::VariableId, store::DomainStore};

/// A variable-selection policy.
///
/// Implementors choose the next unbound decision variable to branch on.
/// All provided policies are deterministic: reproducing a search exactly
/// requires that ties never depend on unspecified iteration order.
pub trait VariableSelection: std::fmt::Debug {
    /// Returns the next variable to assign, or `None` when every decision
    /// variable is already bound.
    fn select(&self, decision: &[VariableId], store: &DomainStore) -> Option<VariableId>;
}

/// Picks the first unbound variable in declaration order.
///
/// This matches the classic CHOOSE_FIRST_UNBOUND phase policy and is the
/// default.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUnbound;

impl VariableSelection for FirstUnbound {
    fn select(&self, decision: &[VariableId], store: &DomainStore) -> Option<VariableId> {
        decision.iter().copied().find(|&var| !store.is_bound(var))
    }
}

/// Picks the unbound variable with the fewest remaining values, breaking
/// ties by declaration order.
///
/// A fail-first policy: tackling the most constrained variable early tends
/// to prune the search space sooner.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumRemainingValues;

impl VariableSelection for MinimumRemainingValues {
    fn select(&self, decision: &[VariableId], store: &DomainStore) -> Option<VariableId> {
        decision
            .iter()
            .copied()
            .filter(|&var| !store.is_bound(var))
            .min_by_key(|&var| store.size(var))
    }
}
