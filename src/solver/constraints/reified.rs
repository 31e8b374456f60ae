//! Indicator variables wired to reified predicates.
//!
//! Each constraint here ties a 0/1 indicator `B` to the truth of a
//! predicate over other variables and propagates in both directions. While
//! the predicate is undecided (an operand unbound, the predicate neither
//! forced nor refuted), the indicator stays unbound; resolution is
//! deferred, never guessed.

use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Enforces `B <==> (X == Y)`.
#[derive(Debug, Clone)]
pub struct ReifiedEqual {
    vars: [VariableId; 3],
}

impl ReifiedEqual {
    pub fn new(b: VariableId, x: VariableId, y: VariableId) -> Self {
        Self { vars: [b, x, y] }
    }
}

impl Constraint for ReifiedEqual {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "ReifiedEqual".to_string(),
            description: format!(
                "?{} <==> (?{} == ?{})",
                self.vars[0], self.vars[1], self.vars[2]
            ),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let [b, x, y] = self.vars;
        let mut changed = false;

        // (X, Y) to B.
        let disjoint = !store.values(x).any(|v| store.contains(y, v));
        if disjoint {
            changed |= store.assign(b, 0)?;
        } else if let (Some(xv), Some(yv)) = (store.value(x), store.value(y)) {
            if xv == yv {
                changed |= store.assign(b, 1)?;
            }
        }

        // B to (X, Y).
        match store.value(b) {
            Some(0) => {
                if let Some(xv) = store.value(x) {
                    changed |= store.remove(y, xv)?;
                }
                if let Some(yv) = store.value(y) {
                    changed |= store.remove(x, yv)?;
                }
            }
            Some(_) => {
                changed |= store.equate(x, y)?;
            }
            None => {}
        }

        Ok(Propagation::from_changed(changed))
    }
}

/// Enforces `B <==> (X == k)` for a constant `k`.
#[derive(Debug, Clone)]
pub struct ReifiedEqualConst {
    vars: [VariableId; 2],
    k: i64,
}

impl ReifiedEqualConst {
    pub fn new(b: VariableId, x: VariableId, k: i64) -> Self {
        Self { vars: [b, x], k }
    }
}

impl Constraint for ReifiedEqualConst {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "ReifiedEqualConst".to_string(),
            description: format!("?{} <==> (?{} == {})", self.vars[0], self.vars[1], self.k),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let [b, x] = self.vars;
        let mut changed = false;

        if !store.contains(x, self.k) {
            changed |= store.assign(b, 0)?;
        } else if store.value(x) == Some(self.k) {
            changed |= store.assign(b, 1)?;
        }

        match store.value(b) {
            Some(0) => changed |= store.remove(x, self.k)?,
            Some(_) => changed |= store.assign(x, self.k)?,
            None => {}
        }

        Ok(Propagation::from_changed(changed))
    }
}

/// Enforces `B <==> (X > 0)`, the "works that day" indicator form.
#[derive(Debug, Clone)]
pub struct ReifiedPositive {
    vars: [VariableId; 2],
}

impl ReifiedPositive {
    pub fn new(b: VariableId, x: VariableId) -> Self {
        Self { vars: [b, x] }
    }
}

impl Constraint for ReifiedPositive {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "ReifiedPositive".to_string(),
            description: format!("?{} <==> (?{} > 0)", self.vars[0], self.vars[1]),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let [b, x] = self.vars;
        let mut changed = false;

        if store.min(x) > 0 {
            changed |= store.assign(b, 1)?;
        } else if store.max(x) <= 0 {
            changed |= store.assign(b, 0)?;
        }

        match store.value(b) {
            Some(0) => changed |= store.narrow_at_most(x, 0)?,
            Some(_) => changed |= store.narrow_at_least(x, 1)?,
            None => {}
        }

        Ok(Propagation::from_changed(changed))
    }
}
