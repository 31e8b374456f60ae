//! Bounded sums over 0/1 indicator variables.

use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Which side of the bound a [`BoolSum`] enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumBound {
    AtLeast,
    AtMost,
}

/// Enforces `Σ terms >= bound` or `Σ terms <= bound`, where every term is a
/// 0/1 indicator.
///
/// Reasoning is over bounds of the sum, not arc consistency: the constraint
/// counts the terms already bound to 1, conflicts when the remaining
/// unbound terms cannot reach (or cannot avoid exceeding) the bound, and
/// forces the remainder only when the count is tight.
#[derive(Debug, Clone)]
pub struct BoolSum {
    terms: Vec<VariableId>,
    kind: SumBound,
    bound: i64,
}

impl BoolSum {
    pub fn new(terms: Vec<VariableId>, kind: SumBound, bound: i64) -> Self {
        Self { terms, kind, bound }
    }
}

impl Constraint for BoolSum {
    fn variables(&self) -> &[VariableId] {
        &self.terms
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let terms_str = self
            .terms
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(" + ");
        let op = match self.kind {
            SumBound::AtLeast => ">=",
            SumBound::AtMost => "<=",
        };
        ConstraintDescriptor {
            name: "BoolSum".to_string(),
            description: format!("{terms_str} {op} {}", self.bound),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let mut ones = 0i64;
        let mut unbound: Vec<VariableId> = Vec::new();
        for &term in &self.terms {
            match store.value(term) {
                Some(v) if v >= 1 => ones += 1,
                Some(_) => {}
                None => unbound.push(term),
            }
        }

        let mut changed = false;
        match self.kind {
            SumBound::AtLeast => {
                let reachable = ones + unbound.len() as i64;
                if reachable < self.bound {
                    return Err(Wipeout);
                }
                if ones < self.bound && reachable == self.bound {
                    for term in unbound {
                        changed |= store.assign(term, 1)?;
                    }
                }
            }
            SumBound::AtMost => {
                if ones > self.bound {
                    return Err(Wipeout);
                }
                if ones == self.bound {
                    for term in unbound {
                        changed |= store.assign(term, 0)?;
                    }
                }
            }
        }
        Ok(Propagation::from_changed(changed))
    }
}
