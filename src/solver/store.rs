//! Trailed domain storage for one solving episode.
//!
//! The [`DomainStore`] owns every variable's [`Domain`](crate::solver::domain::Domain)
//! together with the trail: a log of `(variable, removed value)` pairs.
//! Every mutation goes through the store and is logged, so
//! [`DomainStore::undo_to`] can rewind to any earlier [`TrailMark`] in
//! O(changes) rather than O(copy). No mutation bypasses the trail.

use crate::solver::{
    domain::{Domain, Wipeout},
    engine::VariableId,
};

/// A saved position on the trail. Undoing to a mark restores every domain
/// to its exact state when the mark was taken.
#[derive(Debug, Clone, Copy)]
pub struct TrailMark(usize);

/// All mutable domain state of an in-progress solve.
#[derive(Debug)]
pub struct DomainStore {
    domains: Vec<Domain>,
    trail: Vec<(VariableId, i64)>,
}

impl DomainStore {
    /// Builds a store with one full domain per `(lo, hi)` range, in
    /// declaration order. Ranges are validated by the model layer.
    pub fn new(ranges: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self {
            domains: ranges
                .into_iter()
                .map(|(lo, hi)| Domain::new(lo, hi))
                .collect(),
            trail: Vec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn min(&self, var: VariableId) -> i64 {
        self.domains[var as usize].min()
    }

    pub fn max(&self, var: VariableId) -> i64 {
        self.domains[var as usize].max()
    }

    pub fn size(&self, var: VariableId) -> u32 {
        self.domains[var as usize].size()
    }

    pub fn is_bound(&self, var: VariableId) -> bool {
        self.domains[var as usize].is_bound()
    }

    /// The bound value of `var`, or `None` while it still has alternatives.
    pub fn value(&self, var: VariableId) -> Option<i64> {
        self.domains[var as usize].value()
    }

    pub fn contains(&self, var: VariableId, v: i64) -> bool {
        self.domains[var as usize].contains(v)
    }

    /// Ascending iteration over the remaining values of `var`.
    pub fn values(&self, var: VariableId) -> impl Iterator<Item = i64> + '_ {
        self.domains[var as usize].iter()
    }

    /// Removes a single value. `Ok(true)` if the domain changed,
    /// `Err(Wipeout)` if it became empty.
    pub fn remove(&mut self, var: VariableId, v: i64) -> Result<bool, Wipeout> {
        if self.domains[var as usize].clear_value(v) {
            self.trail.push((var, v));
            if self.domains[var as usize].size() == 0 {
                return Err(Wipeout);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Removes every value in `doomed` from `var`'s domain.
    pub fn remove_all(&mut self, var: VariableId, doomed: &[i64]) -> Result<bool, Wipeout> {
        let mut changed = false;
        for &v in doomed {
            if self.domains[var as usize].clear_value(v) {
                self.trail.push((var, v));
                changed = true;
            }
        }
        if self.domains[var as usize].size() == 0 {
            return Err(Wipeout);
        }
        Ok(changed)
    }

    /// Prunes everything below `v`.
    pub fn narrow_at_least(&mut self, var: VariableId, v: i64) -> Result<bool, Wipeout> {
        if self.domains[var as usize].min() >= v {
            return Ok(false);
        }
        let doomed: Vec<i64> = self.values(var).take_while(|&x| x < v).collect();
        self.remove_all(var, &doomed)
    }

    /// Prunes everything above `v`.
    pub fn narrow_at_most(&mut self, var: VariableId, v: i64) -> Result<bool, Wipeout> {
        if self.domains[var as usize].max() <= v {
            return Ok(false);
        }
        let doomed: Vec<i64> = self.values(var).skip_while(|&x| x <= v).collect();
        self.remove_all(var, &doomed)
    }

    /// Narrows to the intersection with `[lo, hi]`.
    pub fn restrict(&mut self, var: VariableId, lo: i64, hi: i64) -> Result<bool, Wipeout> {
        let below = self.narrow_at_least(var, lo)?;
        let above = self.narrow_at_most(var, hi)?;
        Ok(below || above)
    }

    /// Binds `var` to `v` by removing every other value. Wipes out if `v`
    /// is not in the domain.
    pub fn assign(&mut self, var: VariableId, v: i64) -> Result<bool, Wipeout> {
        let doomed: Vec<i64> = self.values(var).filter(|&x| x != v).collect();
        self.remove_all(var, &doomed)?;
        if !self.contains(var, v) {
            return Err(Wipeout);
        }
        Ok(!doomed.is_empty())
    }

    /// Intersects the domains of `a` and `b` with each other, the single
    /// synchronization primitive behind hard equality.
    pub fn equate(&mut self, a: VariableId, b: VariableId) -> Result<bool, Wipeout> {
        let doomed_a: Vec<i64> = self.values(a).filter(|&v| !self.contains(b, v)).collect();
        let doomed_b: Vec<i64> = self.values(b).filter(|&v| !self.contains(a, v)).collect();
        let changed_a = self.remove_all(a, &doomed_a)?;
        let changed_b = self.remove_all(b, &doomed_b)?;
        Ok(changed_a || changed_b)
    }

    /// Saves the current trail position.
    pub fn mark(&self) -> TrailMark {
        TrailMark(self.trail.len())
    }

    /// Replays the trail backward to `mark`, re-inserting every removed
    /// value. Restores the exact pre-mark state of every domain.
    pub fn undo_to(&mut self, mark: TrailMark) {
        while self.trail.len() > mark.0 {
            if let Some((var, v)) = self.trail.pop() {
                self.domains[var as usize].insert_value(v);
            }
        }
    }

    /// Variables whose domains shrank since `mark`, in trailing order.
    /// May repeat a variable; consumers deduplicate.
    pub fn trailed_since(&self, mark: TrailMark) -> impl Iterator<Item = VariableId> + '_ {
        self.trail[mark.0..].iter().map(|&(var, _)| var)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn values_of(store: &DomainStore, var: VariableId) -> Vec<i64> {
        store.values(var).collect()
    }

    #[test]
    fn narrowing_is_trailed_and_undone_exactly() {
        let mut store = DomainStore::new([(0, 5), (0, 5)]);
        let mark = store.mark();

        assert!(store.narrow_at_least(0, 2).unwrap());
        assert!(store.narrow_at_most(0, 4).unwrap());
        assert!(store.remove(1, 3).unwrap());
        assert_eq!(values_of(&store, 0), vec![2, 3, 4]);

        store.undo_to(mark);
        assert_eq!(values_of(&store, 0), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(values_of(&store, 1), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn marks_nest() {
        let mut store = DomainStore::new([(0, 3)]);
        let outer = store.mark();
        store.remove(0, 0).unwrap();
        let inner = store.mark();
        store.assign(0, 2).unwrap();
        assert_eq!(store.value(0), Some(2));

        store.undo_to(inner);
        assert_eq!(values_of(&store, 0), vec![1, 2, 3]);
        store.undo_to(outer);
        assert_eq!(values_of(&store, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn wipeout_leaves_a_recoverable_trail() {
        let mut store = DomainStore::new([(1, 2)]);
        let mark = store.mark();
        store.remove(0, 1).unwrap();
        assert_eq!(store.remove(0, 2), Err(Wipeout));

        store.undo_to(mark);
        assert_eq!(values_of(&store, 0), vec![1, 2]);
    }

    #[test]
    fn assign_to_absent_value_wipes_out() {
        let mut store = DomainStore::new([(0, 4)]);
        store.remove(0, 3).unwrap();
        assert_eq!(store.assign(0, 3), Err(Wipeout));
    }

    #[test]
    fn equate_intersects_both_sides() {
        let mut store = DomainStore::new([(0, 3), (2, 5)]);
        assert!(store.equate(0, 1).unwrap());
        assert_eq!(values_of(&store, 0), vec![2, 3]);
        assert_eq!(values_of(&store, 1), vec![2, 3]);
    }

    #[test]
    fn trailed_since_reports_shrunk_variables() {
        let mut store = DomainStore::new([(0, 2), (0, 2)]);
        let mark = store.mark();
        store.remove(1, 0).unwrap();
        store.remove(0, 2).unwrap();
        let touched: Vec<_> = store.trailed_since(mark).collect();
        assert_eq!(touched, vec![1, 0]);
    }

    mod prop_tests {
        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Remove(i64),
            AtLeast(i64),
            AtMost(i64),
            Assign(i64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..10i64).prop_map(Op::Remove),
                (0..10i64).prop_map(Op::AtLeast),
                (0..10i64).prop_map(Op::AtMost),
                (0..10i64).prop_map(Op::Assign),
            ]
        }

        fn apply(store: &mut DomainStore, var: VariableId, op: &Op) {
            // A wipeout is fine here; the trail must still rewind cleanly.
            let _ = match op {
                Op::Remove(v) => store.remove(var, *v),
                Op::AtLeast(v) => store.narrow_at_least(var, *v),
                Op::AtMost(v) => store.narrow_at_most(var, *v),
                Op::Assign(v) => store.assign(var, *v),
            };
        }

        proptest! {
            #[test]
            fn undo_restores_the_marked_state(
                prefix in proptest::collection::vec(op_strategy(), 0..6),
                suffix in proptest::collection::vec(op_strategy(), 0..8),
            ) {
                let mut store = DomainStore::new([(0, 9), (0, 9)]);
                for op in &prefix {
                    apply(&mut store, 0, op);
                    apply(&mut store, 1, op);
                }

                let snapshot: (Vec<i64>, Vec<i64>) =
                    (store.values(0).collect(), store.values(1).collect());
                let mark = store.mark();

                for op in &suffix {
                    apply(&mut store, 0, op);
                    apply(&mut store, 1, op);
                }
                store.undo_to(mark);

                prop_assert_eq!(store.values(0).collect::<Vec<_>>(), snapshot.0);
                prop_assert_eq!(store.values(1).collect::<Vec<_>>(), snapshot.1);
            }
        }
    }
}
