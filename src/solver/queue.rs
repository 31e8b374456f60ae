//! The propagation work-list for one search node.
//!
//! Constraints are scheduled by id, idempotently: a constraint already
//! pending is not enqueued twice. After a constraint prunes, every *other*
//! constraint watching one of the shrunk variables is re-enqueued, and the
//! loop continues until the queue drains (fixpoint) or a constraint wipes
//! out a domain. The queue is reset to "all constraints" once per node
//! entry and carries no state across nodes.

use std::{collections::VecDeque, time::Instant};

use tracing::trace;

use crate::solver::{
    constraint::{Constraint, Propagation},
    domain::Wipeout,
    engine::{ConstraintId, SearchStats, VariableId},
    store::DomainStore,
};

/// Result of running the queue to quiescence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixpoint {
    Consistent,
    Conflict,
}

pub struct PropagationQueue {
    pending: VecDeque<ConstraintId>,
    queued: Vec<bool>,
    /// For each variable, the constraints whose scope contains it.
    watchers: Vec<Vec<ConstraintId>>,
    scratch: Vec<VariableId>,
}

impl PropagationQueue {
    pub fn new(num_variables: usize, constraints: &[Box<dyn Constraint>]) -> Self {
        let mut watchers: Vec<Vec<ConstraintId>> = vec![Vec::new(); num_variables];
        for (id, constraint) in constraints.iter().enumerate() {
            for &var in constraint.variables() {
                let watching = &mut watchers[var as usize];
                // A variable can appear twice in one scope; watch it once.
                if watching.last() != Some(&id) {
                    watching.push(id);
                }
            }
        }
        Self {
            pending: VecDeque::with_capacity(constraints.len()),
            queued: vec![false; constraints.len()],
            watchers,
            scratch: Vec::new(),
        }
    }

    /// Discards any pending work and schedules every constraint.
    pub fn schedule_all(&mut self) {
        self.pending.clear();
        self.queued.fill(true);
        self.pending.extend(0..self.queued.len());
    }

    pub fn enqueue(&mut self, id: ConstraintId) {
        if !self.queued[id] {
            self.queued[id] = true;
            self.pending.push_back(id);
        }
    }

    /// Pops and propagates until quiescent or inconsistent. On conflict the
    /// queue may still hold stale entries; the next `schedule_all` clears
    /// them.
    pub fn run_to_fixpoint(
        &mut self,
        store: &mut DomainStore,
        constraints: &[Box<dyn Constraint>],
        stats: &mut SearchStats,
    ) -> Fixpoint {
        while let Some(id) = self.pending.pop_front() {
            self.queued[id] = false;

            let before = store.mark();
            let started = Instant::now();
            let outcome = constraints[id].propagate(store);

            let per_constraint = stats.constraint_stats.entry(id).or_default();
            per_constraint.revisions += 1;
            per_constraint.time_spent_micros += started.elapsed().as_micros() as u64;

            match outcome {
                Err(Wipeout) => {
                    trace!(constraint = id, "propagation wiped out a domain");
                    return Fixpoint::Conflict;
                }
                Ok(Propagation::Unchanged) => {}
                Ok(Propagation::Pruned) => {
                    per_constraint.prunings += 1;
                    self.scratch.clear();
                    self.scratch.extend(store.trailed_since(before));
                    for i in 0..self.scratch.len() {
                        let var = self.scratch[i];
                        for j in 0..self.watchers[var as usize].len() {
                            let peer = self.watchers[var as usize][j];
                            if peer != id {
                                self.enqueue(peer);
                            }
                        }
                    }
                }
            }
        }
        Fixpoint::Consistent
    }
}
