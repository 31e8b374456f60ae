use crate::solver::{domain::Wipeout, engine::VariableId, store::DomainStore};

#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub description: String,
}

/// Outcome of one propagation step that did not wipe out a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No domain changed; nothing to reschedule.
    Unchanged,
    /// At least one domain shrank; peers of the changed variables must be
    /// re-examined.
    Pruned,
}

impl Propagation {
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            Propagation::Pruned
        } else {
            Propagation::Unchanged
        }
    }
}

/// The propagation protocol. A constraint prunes the domains of its scope
/// given the current store and reports one of three outcomes: no change,
/// changed-but-consistent, or inconsistent (`Err(Wipeout)`).
///
/// Propagation must be sound: it only removes values that cannot appear in
/// any solution consistent with the currently bound variables. Constraints
/// hold no search state of their own; everything they know flows through
/// the store.
pub trait Constraint: std::fmt::Debug {
    /// The constraint's scope, in posting order.
    fn variables(&self) -> &[VariableId];

    fn descriptor(&self) -> ConstraintDescriptor;

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout>;
}
