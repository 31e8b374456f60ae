//! Recording of satisfying assignments.
//!
//! The collector snapshots the registered decision variables at every
//! consistent leaf the search reaches. Snapshots are plain value vectors,
//! fully detached from the mutable domains, so they survive backtracking
//! untouched. Nothing is deduplicated: symmetric assignments the
//! constraints did not forbid count as distinct solutions.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    solver::{engine::VariableId, store::DomainStore},
};

/// Accumulates solutions during one solve call.
#[derive(Debug)]
pub struct SolutionCollector {
    set: SolutionSet,
}

impl SolutionCollector {
    /// Registers the decision variables whose values each snapshot records,
    /// in the given order.
    pub fn new(variables: Vec<VariableId>) -> Self {
        Self {
            set: SolutionSet::empty(variables),
        }
    }

    /// Snapshots the current assignment. Every registered variable is bound
    /// when the engine calls this; `min` is then the bound value.
    pub fn record(&mut self, store: &DomainStore) {
        let snapshot = self
            .set
            .variables
            .iter()
            .map(|&var| store.min(var))
            .collect();
        self.set.assignments.push(snapshot);
    }

    pub fn count(&self) -> usize {
        self.set.count()
    }

    pub fn into_set(self) -> SolutionSet {
        self.set
    }
}

/// The immutable result of a solve: solutions numbered from 0 in the order
/// the search found them.
///
/// An empty set is the normal answer for an unsatisfiable model; callers
/// check [`SolutionSet::count`] before indexing.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSet {
    variables: Vec<VariableId>,
    assignments: Vec<Vec<i64>>,
    #[serde(skip)]
    slot_of: HashMap<VariableId, usize>,
}

impl SolutionSet {
    fn empty(variables: Vec<VariableId>) -> Self {
        let slot_of = variables
            .iter()
            .enumerate()
            .map(|(slot, &var)| (var, slot))
            .collect();
        Self {
            variables,
            assignments: Vec::new(),
            slot_of,
        }
    }

    pub fn count(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The registered decision variables, in snapshot order.
    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    /// The value `var` took in solution number `solution`.
    pub fn value_at(&self, solution: usize, var: VariableId) -> Result<i64> {
        let slot = *self
            .slot_of
            .get(&var)
            .ok_or(Error::VariableNotCollected(var))?;
        Ok(self.assignment(solution)?[slot])
    }

    /// The full snapshot of solution number `solution`, ordered like
    /// [`SolutionSet::variables`].
    pub fn assignment(&self, solution: usize) -> Result<&[i64]> {
        self.assignments
            .get(solution)
            .map(Vec::as_slice)
            .ok_or(Error::SolutionIndexOutOfRange {
                index: solution,
                count: self.assignments.len(),
            })
    }
}
