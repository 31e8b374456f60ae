//! Strategies for choosing which value to try first for a branched
//! variable.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::solver::{engine::VariableId, store::DomainStore};

/// A value-ordering policy.
///
/// Called only for unbound variables; the returned value is always taken
/// from the variable's current domain. The engine tries the chosen value
/// first and re-consults the policy after excluding it, so a policy sees
/// each shrinking domain in turn.
pub trait ValueSelection: std::fmt::Debug {
    fn choose(&mut self, var: VariableId, store: &DomainStore) -> i64;
}

/// Tries the smallest admissible value first (ASSIGN_MIN_VALUE). The
/// default, and the policy the regression baselines assume.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinValueFirst;

impl ValueSelection for MinValueFirst {
    fn choose(&mut self, var: VariableId, store: &DomainStore) -> i64 {
        store.min(var)
    }
}

/// Tries the largest admissible value first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxValueFirst;

impl ValueSelection for MaxValueFirst {
    fn choose(&mut self, var: VariableId, store: &DomainStore) -> i64 {
        store.max(var)
    }
}

/// Picks a uniformly random admissible value, from a seeded generator so
/// that runs remain reproducible.
#[derive(Debug, Clone)]
pub struct RandomValue {
    rng: ChaCha8Rng,
}

impl RandomValue {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ValueSelection for RandomValue {
    fn choose(&mut self, var: VariableId, store: &DomainStore) -> i64 {
        let pick = self.rng.gen_range(0..store.size(var)) as usize;
        store
            .values(var)
            .nth(pick)
            .unwrap_or_else(|| store.min(var))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn min_and_max_follow_the_current_bounds() {
        let mut store = DomainStore::new([(0, 9)]);
        store.restrict(0, 2, 7).unwrap();

        assert_eq!(MinValueFirst.choose(0, &store), 2);
        assert_eq!(MaxValueFirst.choose(0, &store), 7);
    }

    #[test]
    fn random_choice_stays_in_the_domain_and_reproduces() {
        let mut store = DomainStore::new([(0, 9)]);
        store.remove(0, 4).unwrap();
        store.remove(0, 5).unwrap();

        let mut first = RandomValue::seeded(7);
        let mut second = RandomValue::seeded(7);
        for _ in 0..20 {
            let a = first.choose(0, &store);
            let b = second.choose(0, &store);
            assert_eq!(a, b);
            assert!(store.contains(0, a));
        }
    }
}
