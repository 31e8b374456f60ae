use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Ensures all variables in a set take pairwise distinct values.
///
/// Propagation strength is deliberately modest: when a variable in the set
/// becomes bound, its value is pruned from every peer's domain. Two
/// variables bound to the same value wipe each other out. No Hall-set or
/// bound-consistency reasoning is attempted; the value-removal-on-binding
/// level is the contract.
#[derive(Debug, Clone)]
pub struct AllDifferent {
    vars: Vec<VariableId>,
}

impl AllDifferent {
    pub fn new(vars: Vec<VariableId>) -> Self {
        Self { vars }
    }
}

impl Constraint for AllDifferent {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let vars_str = self
            .vars
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(", ");
        ConstraintDescriptor {
            name: "AllDifferent".to_string(),
            description: format!("AllDifferent({vars_str})"),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let mut changed = false;
        for (i, &var) in self.vars.iter().enumerate() {
            let mut doomed: Vec<i64> = Vec::new();
            for (j, &peer) in self.vars.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(fixed) = store.value(peer) {
                    if store.contains(var, fixed) {
                        doomed.push(fixed);
                    }
                }
            }
            if !doomed.is_empty() {
                changed |= store.remove_all(var, &doomed)?;
            }
        }
        Ok(Propagation::from_changed(changed))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn prunes_singleton_value_from_peers() {
        let constraint = AllDifferent::new(vec![0, 1, 2]);
        // ?1 is already bound to 1.
        let mut store = DomainStore::new([(1, 2), (1, 1), (1, 3)]);

        let outcome = constraint.propagate(&mut store).unwrap();
        assert_eq!(outcome, Propagation::Pruned);
        assert_eq!(store.value(0), Some(2));
        assert!(!store.contains(2, 1));
    }

    #[test]
    fn does_nothing_if_no_singletons() {
        let constraint = AllDifferent::new(vec![0, 1]);
        let mut store = DomainStore::new([(1, 2), (1, 2)]);

        let outcome = constraint.propagate(&mut store).unwrap();
        assert_eq!(outcome, Propagation::Unchanged);
    }

    #[test]
    fn prunes_multiple_singletons_at_once() {
        let constraint = AllDifferent::new(vec![0, 1, 2]);
        let mut store = DomainStore::new([(1, 3), (1, 1), (2, 2)]);

        let outcome = constraint.propagate(&mut store).unwrap();
        assert_eq!(outcome, Propagation::Pruned);
        assert_eq!(store.value(0), Some(3));
    }

    #[test]
    fn two_equal_singletons_conflict() {
        let constraint = AllDifferent::new(vec![0, 1]);
        let mut store = DomainStore::new([(5, 5), (5, 5)]);

        assert_eq!(constraint.propagate(&mut store), Err(Wipeout));
    }
}
