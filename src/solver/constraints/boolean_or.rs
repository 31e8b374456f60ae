//! Disjunctions over 0/1 indicator variables.
//!
//! [`Or`] is the hard form (at least one operand is true); [`ReifiedOr`]
//! ties an output indicator to the disjunction of its operands, the shape
//! behind "works this shift at all" variables built from per-day equality
//! indicators.

use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Enforces `B1 OR B2 OR ... OR Bn`.
#[derive(Debug, Clone)]
pub struct Or {
    vars: Vec<VariableId>,
}

impl Or {
    pub fn new(vars: Vec<VariableId>) -> Self {
        Self { vars }
    }
}

impl Constraint for Or {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let vars_str = self
            .vars
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        ConstraintDescriptor {
            name: "Or".to_string(),
            description: vars_str,
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let mut undecided: Vec<VariableId> = Vec::new();
        for &var in &self.vars {
            match store.value(var) {
                // Already satisfied.
                Some(v) if v >= 1 => return Ok(Propagation::Unchanged),
                Some(_) => {}
                None => undecided.push(var),
            }
        }
        match undecided.as_slice() {
            [] => Err(Wipeout),
            // Every other operand is false, so the last one must hold.
            [last_hope] => {
                let changed = store.assign(*last_hope, 1)?;
                Ok(Propagation::from_changed(changed))
            }
            _ => Ok(Propagation::Unchanged),
        }
    }
}

/// Enforces `B <==> (B1 OR B2 OR ... OR Bn)`.
#[derive(Debug, Clone)]
pub struct ReifiedOr {
    b_out: VariableId,
    b_in: Vec<VariableId>,
    all_vars: Vec<VariableId>,
}

impl ReifiedOr {
    pub fn new(b_out: VariableId, b_in: Vec<VariableId>) -> Self {
        let mut all_vars = b_in.clone();
        all_vars.push(b_out);
        Self {
            b_out,
            b_in,
            all_vars,
        }
    }
}

impl Constraint for ReifiedOr {
    fn variables(&self) -> &[VariableId] {
        &self.all_vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let terms_str = self
            .b_in
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        ConstraintDescriptor {
            name: "ReifiedOr".to_string(),
            description: format!("?{} <==> ({terms_str})", self.b_out),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let mut changed = false;

        let mut any_true = false;
        let mut all_false = true;
        let mut undecided: Vec<VariableId> = Vec::new();
        for &var in &self.b_in {
            match store.value(var) {
                Some(v) if v >= 1 => {
                    any_true = true;
                    all_false = false;
                    break;
                }
                Some(_) => {}
                None => {
                    all_false = false;
                    undecided.push(var);
                }
            }
        }

        // Operands to output.
        if any_true {
            changed |= store.assign(self.b_out, 1)?;
        } else if all_false {
            changed |= store.assign(self.b_out, 0)?;
        }

        // Output to operands.
        match store.value(self.b_out) {
            Some(0) => {
                for &var in &self.b_in {
                    changed |= store.assign(var, 0)?;
                }
            }
            Some(_) if !any_true => {
                // Output is true but no operand is yet; with a single
                // undecided operand left, it carries the disjunction.
                if let [last_hope] = undecided.as_slice() {
                    changed |= store.assign(*last_hope, 1)?;
                }
            }
            _ => {}
        }

        Ok(Propagation::from_changed(changed))
    }
}
