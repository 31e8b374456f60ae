//! The element relation `array[index] == target`.
//!
//! This is the single synchronization mechanism between the two views of a
//! schedule (staff-to-shift and shift-to-staff): each view is modelled as
//! independent variables, and the element constraint keeps them agreeing.

use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Enforces `array[index] == target`.
#[derive(Debug, Clone)]
pub struct Element {
    index: VariableId,
    array: Vec<VariableId>,
    target: VariableId,
    all_vars: Vec<VariableId>,
}

impl Element {
    pub fn new(index: VariableId, array: Vec<VariableId>, target: VariableId) -> Self {
        let mut all_vars = vec![index];
        all_vars.extend_from_slice(&array);
        all_vars.push(target);
        Self {
            index,
            array,
            target,
            all_vars,
        }
    }
}

impl Constraint for Element {
    fn variables(&self) -> &[VariableId] {
        &self.all_vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let array_str = self
            .array
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(", ");
        ConstraintDescriptor {
            name: "Element".to_string(),
            description: format!("[{array_str}][?{}] == ?{}", self.index, self.target),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let mut changed = false;

        // Drop index candidates that are out of range or whose array entry
        // shares no value with the target.
        let doomed: Vec<i64> = store
            .values(self.index)
            .filter(|&i| {
                if i < 0 || i as usize >= self.array.len() {
                    return true;
                }
                let entry = self.array[i as usize];
                !store.values(self.target).any(|v| store.contains(entry, v))
            })
            .collect();
        if !doomed.is_empty() {
            changed |= store.remove_all(self.index, &doomed)?;
        }

        // Once a single candidate survives, the target and that entry are
        // the same value.
        if let Some(i) = store.value(self.index) {
            changed |= store.equate(self.array[i as usize], self.target)?;
        }

        Ok(Propagation::from_changed(changed))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bound_index_equates_entry_and_target() {
        let constraint = Element::new(0, vec![1, 2], 3);
        // index = 1, so array entry ?2 must equal the target ?3.
        let mut store = DomainStore::new([(1, 1), (0, 9), (2, 6), (4, 8)]);

        assert_eq!(constraint.propagate(&mut store).unwrap(), Propagation::Pruned);
        assert_eq!(store.values(2).collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(store.values(3).collect::<Vec<_>>(), vec![4, 5, 6]);
        // The untouched entry keeps its full domain.
        assert_eq!(store.size(1), 10);
    }

    #[test]
    fn unsupported_candidates_are_removed() {
        let constraint = Element::new(0, vec![1, 2, 3], 4);
        // Entry ?1 can never match the target (disjoint domains), entry ?2
        // can; candidate 2 is out of support as well.
        let mut store = DomainStore::new([(0, 2), (0, 1), (5, 6), (0, 1), (5, 9)]);

        assert_eq!(constraint.propagate(&mut store).unwrap(), Propagation::Pruned);
        // Only candidate 1 survives, which also binds the index and
        // equates ?2 with the target.
        assert_eq!(store.value(0), Some(1));
        assert_eq!(store.values(4).collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn out_of_range_candidates_are_removed() {
        let constraint = Element::new(0, vec![1], 2);
        let mut store = DomainStore::new([(0, 5), (0, 9), (0, 9)]);

        assert_eq!(constraint.propagate(&mut store).unwrap(), Propagation::Pruned);
        assert_eq!(store.value(0), Some(0));
    }

    #[test]
    fn no_supported_candidate_conflicts() {
        let constraint = Element::new(0, vec![1, 2], 3);
        let mut store = DomainStore::new([(0, 1), (0, 1), (0, 1), (7, 8)]);

        assert_eq!(constraint.propagate(&mut store), Err(Wipeout));
    }

    #[test]
    fn consistent_state_reports_no_change() {
        let constraint = Element::new(0, vec![1, 2], 3);
        let mut store = DomainStore::new([(0, 1), (0, 9), (0, 9), (0, 9)]);

        assert_eq!(
            constraint.propagate(&mut store).unwrap(),
            Propagation::Unchanged
        );
    }
}
