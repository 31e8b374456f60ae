use crate::solver::{
    constraint::{Constraint, ConstraintDescriptor, Propagation},
    domain::Wipeout,
    engine::VariableId,
    store::DomainStore,
};

/// Hard equality `?a == ?b`, maintained by intersecting both domains.
#[derive(Debug, Clone)]
pub struct Equal {
    vars: [VariableId; 2],
}

impl Equal {
    pub fn new(a: VariableId, b: VariableId) -> Self {
        Self { vars: [a, b] }
    }
}

impl Constraint for Equal {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "Equal".to_string(),
            description: format!("?{} == ?{}", self.vars[0], self.vars[1]),
        }
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<Propagation, Wipeout> {
        let changed = store.equate(self.vars[0], self.vars[1])?;
        Ok(Propagation::from_changed(changed))
    }
}
