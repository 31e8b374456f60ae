//! The depth-first backtracking search driver.
//!
//! Each node pushes a trail mark, runs the propagation queue to fixpoint,
//! and then either fails (conflict, undo and backtrack), records a solution
//! (every decision variable bound, then a forced backtrack so enumeration
//! continues), or branches: try `var == value`, and after that subtree is
//! exhausted, exclude `value` and re-enter propagation at the same node.
//! Undo is O(changes) via the trail; nothing is copied.

use std::{collections::HashMap, time::Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::solver::{
    collector::SolutionCollector,
    constraint::Constraint,
    heuristics::{value::ValueSelection, variable::VariableSelection},
    queue::{Fixpoint, PropagationQueue},
    store::DomainStore,
};

pub type VariableId = u32;
pub type ConstraintId = usize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct PerConstraintStats {
    pub revisions: u64,
    pub prunings: u64,
    pub time_spent_micros: u64,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SearchStats {
    pub nodes_visited: u64,
    /// Branches abandoned because a domain wiped out; the forced backtrack
    /// after a recorded solution is not counted.
    pub backtracks: u64,
    pub solutions: u64,
    pub constraint_stats: HashMap<ConstraintId, PerConstraintStats>,
}

/// Optional early-termination criteria, checked at every node entry.
///
/// The default runs the search tree to full exhaustion.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolveLimit {
    /// Stop once this many solutions have been collected.
    pub max_solutions: Option<u64>,
    /// Stop once this point in time has passed.
    pub deadline: Option<Instant>,
}

impl SolveLimit {
    pub fn exhaustive() -> Self {
        Self::default()
    }

    pub fn first_solution() -> Self {
        Self {
            max_solutions: Some(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeOutcome {
    /// Every alternative under this node was tried; the parent moves on.
    Exhausted,
    /// A limit fired; unwind without trying further alternatives.
    Stopped,
}

struct SearchContext<'a> {
    constraints: &'a [Box<dyn Constraint>],
    decision: &'a [VariableId],
    store: &'a mut DomainStore,
    collector: &'a mut SolutionCollector,
    queue: PropagationQueue,
    stats: SearchStats,
}

/// The search driver. Variable and value ordering are pluggable; the
/// defaults reproduce the first-unbound / minimum-value policies the
/// regression baselines assume.
pub struct SearchEngine {
    variable_selection: Box<dyn VariableSelection>,
    value_selection: Box<dyn ValueSelection>,
    limit: SolveLimit,
}

impl SearchEngine {
    pub fn new(
        variable_selection: Box<dyn VariableSelection>,
        value_selection: Box<dyn ValueSelection>,
    ) -> Self {
        Self {
            variable_selection,
            value_selection,
            limit: SolveLimit::exhaustive(),
        }
    }

    pub fn with_limit(mut self, limit: SolveLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Explores the whole search tree, feeding every consistent leaf to
    /// `collector`. Domains are restored to their pre-solve state before
    /// returning; the collector and the returned stats are the only
    /// observable outputs.
    pub fn solve(
        &mut self,
        constraints: &[Box<dyn Constraint>],
        store: &mut DomainStore,
        decision: &[VariableId],
        collector: &mut SolutionCollector,
    ) -> SearchStats {
        let queue = PropagationQueue::new(store.num_variables(), constraints);
        let mut cx = SearchContext {
            constraints,
            decision,
            store,
            collector,
            queue,
            stats: SearchStats::default(),
        };
        let _ = self.explore(&mut cx);
        debug!(
            nodes = cx.stats.nodes_visited,
            backtracks = cx.stats.backtracks,
            solutions = cx.stats.solutions,
            "search finished"
        );
        cx.stats
    }

    fn limit_reached(&self, cx: &SearchContext<'_>) -> bool {
        self.limit
            .max_solutions
            .is_some_and(|max| cx.collector.count() as u64 >= max)
            || self.limit.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn explore(&mut self, cx: &mut SearchContext<'_>) -> NodeOutcome {
        if self.limit_reached(cx) {
            return NodeOutcome::Stopped;
        }
        cx.stats.nodes_visited += 1;

        let entry = cx.store.mark();
        cx.queue.schedule_all();
        let outcome = loop {
            match cx
                .queue
                .run_to_fixpoint(cx.store, cx.constraints, &mut cx.stats)
            {
                Fixpoint::Conflict => {
                    cx.stats.backtracks += 1;
                    break NodeOutcome::Exhausted;
                }
                Fixpoint::Consistent => {}
            }

            let Some(var) = self.variable_selection.select(cx.decision, cx.store) else {
                // A consistent leaf. Record it, then backtrack as if the
                // branch were exhausted so the search keeps enumerating.
                cx.collector.record(cx.store);
                cx.stats.solutions += 1;
                trace!(solution = cx.collector.count(), "recorded leaf");
                if self
                    .limit
                    .max_solutions
                    .is_some_and(|max| cx.collector.count() as u64 >= max)
                {
                    break NodeOutcome::Stopped;
                }
                break NodeOutcome::Exhausted;
            };
            let value = self.value_selection.choose(var, cx.store);

            // Left branch: var == value.
            let branch = cx.store.mark();
            if cx.store.assign(var, value).is_ok() && self.explore(cx) == NodeOutcome::Stopped {
                break NodeOutcome::Stopped;
            }
            cx.store.undo_to(branch);

            // Right branch: var != value, then retry this node from the
            // propagation phase.
            if cx.store.remove(var, value).is_err() {
                cx.stats.backtracks += 1;
                break NodeOutcome::Exhausted;
            }
            cx.queue.schedule_all();
        };
        cx.store.undo_to(entry);
        outcome
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(
            Box::new(crate::solver::heuristics::variable::FirstUnbound),
            Box::new(crate::solver::heuristics::value::MinValueFirst),
        )
    }
}
