//! The model-building surface of the crate.
//!
//! A [`Model`] collects variable declarations and posted constraints, then
//! hands everything to the [`SearchEngine`](crate::solver::engine::SearchEngine)
//! for solving. Variable handles are plain indices in declaration order,
//! which is also the order the default branching policy visits them — the
//! enumeration a model produces is fully reproducible.

use crate::{
    error::{Error, Result},
    solver::{
        collector::{SolutionCollector, SolutionSet},
        constraint::Constraint,
        constraints::{
            all_different::AllDifferent,
            bool_sum::BoolSum,
            boolean_or::{Or, ReifiedOr},
            element::Element,
            equal::Equal,
            reified::{ReifiedEqual, ReifiedEqualConst, ReifiedPositive},
        },
        engine::{SearchEngine, SearchStats, SolveLimit, VariableId},
        heuristics::{
            value::{MinValueFirst, ValueSelection},
            variable::{FirstUnbound, VariableSelection},
        },
        store::DomainStore,
    },
};

pub use crate::solver::constraints::bool_sum::SumBound;

/// Widest admissible domain, in values. Domains are bitsets over their
/// creation range, so the width bounds the allocation per variable; ranges
/// beyond the cap are rejected at build time, never allocated.
pub const MAX_DOMAIN_WIDTH: i64 = 1 << 24;

/// The declared range and name of one variable.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    pub name: String,
    pub lo: i64,
    pub hi: i64,
}

/// Knobs for a single solve call.
pub struct SolveOptions {
    pub limit: SolveLimit,
    pub variable_selection: Box<dyn VariableSelection>,
    pub value_selection: Box<dyn ValueSelection>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            limit: SolveLimit::exhaustive(),
            variable_selection: Box::new(FirstUnbound),
            value_selection: Box::new(MinValueFirst),
        }
    }
}

/// A finite-domain constraint model: variables plus posted constraints.
///
/// Building is infallible except for structurally invalid requests
/// (inverted ranges, stale handles); an unsatisfiable model builds fine
/// and simply enumerates zero solutions.
#[derive(Debug, Default)]
pub struct Model {
    variables: Vec<VariableInfo>,
    constraints: Vec<Box<dyn Constraint>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an integer variable over `[lo, hi]`.
    ///
    /// Inverted ranges and ranges wider than [`MAX_DOMAIN_WIDTH`] values
    /// are rejected with [`Error::InvalidVariableRange`].
    pub fn new_var(&mut self, lo: i64, hi: i64, name: impl Into<String>) -> Result<VariableId> {
        let name = name.into();
        // Width in i128: [i64::MIN, i64::MAX] must not overflow the check.
        let too_wide = (hi as i128) - (lo as i128) >= MAX_DOMAIN_WIDTH as i128;
        if lo > hi || too_wide {
            return Err(Error::InvalidVariableRange { name, lo, hi });
        }
        self.variables.push(VariableInfo { name, lo, hi });
        Ok((self.variables.len() - 1) as VariableId)
    }

    /// Declares a 0/1 indicator variable.
    pub fn new_bool(&mut self, name: impl Into<String>) -> VariableId {
        self.variables.push(VariableInfo {
            name: name.into(),
            lo: 0,
            hi: 1,
        });
        (self.variables.len() - 1) as VariableId
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variable_info(&self, var: VariableId) -> Result<&VariableInfo> {
        self.variables
            .get(var as usize)
            .ok_or(Error::UnknownVariable(var))
    }

    /// The posted constraints, for stats rendering and introspection.
    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    /// Posts: the given variables take pairwise distinct values.
    pub fn post_all_different(&mut self, vars: &[VariableId]) -> Result<()> {
        self.check_all(vars)?;
        self.constraints
            .push(Box::new(AllDifferent::new(vars.to_vec())));
        Ok(())
    }

    /// Posts the element relation `array[index] == target`.
    pub fn post_element(
        &mut self,
        index: VariableId,
        array: &[VariableId],
        target: VariableId,
    ) -> Result<()> {
        self.check(index)?;
        self.check_all(array)?;
        self.check(target)?;
        self.constraints
            .push(Box::new(Element::new(index, array.to_vec(), target)));
        Ok(())
    }

    /// Posts `Σ terms >= bound` or `Σ terms <= bound` over 0/1 terms.
    pub fn post_bool_sum(
        &mut self,
        terms: &[VariableId],
        kind: SumBound,
        bound: i64,
    ) -> Result<()> {
        self.check_all(terms)?;
        self.constraints
            .push(Box::new(BoolSum::new(terms.to_vec(), kind, bound)));
        Ok(())
    }

    /// Posts `indicator <==> (op1 OR op2 OR ...)`.
    pub fn post_reified_or(
        &mut self,
        indicator: VariableId,
        operands: &[VariableId],
    ) -> Result<()> {
        self.check(indicator)?;
        self.check_all(operands)?;
        self.constraints
            .push(Box::new(ReifiedOr::new(indicator, operands.to_vec())));
        Ok(())
    }

    /// Posts the hard disjunction `op1 OR op2 OR ...`.
    pub fn post_or(&mut self, operands: &[VariableId]) -> Result<()> {
        self.check_all(operands)?;
        self.constraints.push(Box::new(Or::new(operands.to_vec())));
        Ok(())
    }

    /// Posts the hard equality `a == b`.
    pub fn post_equality(&mut self, a: VariableId, b: VariableId) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        self.constraints.push(Box::new(Equal::new(a, b)));
        Ok(())
    }

    /// Creates an indicator for `a == b` and posts the standing reified
    /// equality keeping it consistent. The indicator stays unbound while
    /// either side is.
    pub fn post_reified_equality(&mut self, a: VariableId, b: VariableId) -> Result<VariableId> {
        self.check(a)?;
        self.check(b)?;
        let indicator = self.new_bool(format!("?{a} == ?{b}"));
        self.constraints
            .push(Box::new(ReifiedEqual::new(indicator, a, b)));
        Ok(indicator)
    }

    /// Creates an indicator for `x == k` wired to a standing propagator.
    pub fn post_equals_const(&mut self, x: VariableId, k: i64) -> Result<VariableId> {
        self.check(x)?;
        let indicator = self.new_bool(format!("?{x} == {k}"));
        self.constraints
            .push(Box::new(ReifiedEqualConst::new(indicator, x, k)));
        Ok(indicator)
    }

    /// Creates an indicator for `x > 0` wired to a standing propagator.
    pub fn post_positive(&mut self, x: VariableId) -> Result<VariableId> {
        self.check(x)?;
        let indicator = self.new_bool(format!("?{x} > 0"));
        self.constraints
            .push(Box::new(ReifiedPositive::new(indicator, x)));
        Ok(indicator)
    }

    /// Enumerates every solution over the given decision variables.
    pub fn solve_all(&self, decision: &[VariableId]) -> Result<(SolutionSet, SearchStats)> {
        self.solve_with(decision, SolveOptions::default())
    }

    /// Stops after the first solution.
    pub fn solve_first(&self, decision: &[VariableId]) -> Result<(SolutionSet, SearchStats)> {
        self.solve_with(
            decision,
            SolveOptions {
                limit: SolveLimit::first_solution(),
                ..SolveOptions::default()
            },
        )
    }

    /// Solves with explicit limits and ordering policies.
    pub fn solve_with(
        &self,
        decision: &[VariableId],
        options: SolveOptions,
    ) -> Result<(SolutionSet, SearchStats)> {
        self.check_all(decision)?;
        let mut store = DomainStore::new(self.variables.iter().map(|v| (v.lo, v.hi)));
        let mut collector = SolutionCollector::new(decision.to_vec());
        let mut engine = SearchEngine::new(options.variable_selection, options.value_selection)
            .with_limit(options.limit);
        let stats = engine.solve(&self.constraints, &mut store, decision, &mut collector);
        Ok((collector.into_set(), stats))
    }

    fn check(&self, var: VariableId) -> Result<()> {
        if (var as usize) < self.variables.len() {
            Ok(())
        } else {
            Err(Error::UnknownVariable(var))
        }
    }

    fn check_all(&self, vars: &[VariableId]) -> Result<()> {
        vars.iter().try_for_each(|&var| self.check(var))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn inverted_range_is_rejected_at_build_time() {
        let mut model = Model::new();
        assert!(matches!(
            model.new_var(3, 1, "bad"),
            Err(Error::InvalidVariableRange { lo: 3, hi: 1, .. })
        ));
    }

    #[test]
    fn over_wide_ranges_are_rejected_not_allocated() {
        let mut model = Model::new();
        assert!(matches!(
            model.new_var(i64::MIN, i64::MAX, "wide"),
            Err(Error::InvalidVariableRange { .. })
        ));
        assert!(matches!(
            model.new_var(0, MAX_DOMAIN_WIDTH, "just over"),
            Err(Error::InvalidVariableRange { .. })
        ));
        // Exactly at the cap is fine.
        assert!(model.new_var(0, MAX_DOMAIN_WIDTH - 1, "at cap").is_ok());
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut model = Model::new();
        let a = model.new_var(0, 1, "a").unwrap();
        assert!(matches!(
            model.post_all_different(&[a, 99]),
            Err(Error::UnknownVariable(99))
        ));
        assert!(matches!(
            model.solve_all(&[99]),
            Err(Error::UnknownVariable(99))
        ));
    }

    #[test]
    fn contradictory_all_different_yields_zero_solutions() {
        let mut model = Model::new();
        let vars: Vec<_> = (0..3)
            .map(|i| model.new_var(0, 1, format!("v{i}")).unwrap())
            .collect();
        model.post_all_different(&vars).unwrap();

        let (solutions, _) = model.solve_all(&vars).unwrap();
        assert_eq!(solutions.count(), 0);
    }

    #[test]
    fn element_links_the_two_views() {
        // array = [?a, ?b], target fixed to 5: the index must point at a
        // cell that can hold 5.
        let mut model = Model::new();
        let index = model.new_var(0, 1, "index").unwrap();
        let a = model.new_var(1, 2, "a").unwrap();
        let b = model.new_var(5, 6, "b").unwrap();
        let target = model.new_var(5, 5, "target").unwrap();
        model.post_element(index, &[a, b], target).unwrap();

        let (solutions, _) = model.solve_all(&[index, a, b]).unwrap();
        assert!(solutions.count() > 0);
        for s in 0..solutions.count() {
            assert_eq!(solutions.value_at(s, index).unwrap(), 1);
            assert_eq!(solutions.value_at(s, b).unwrap(), 5);
        }
    }

    #[test]
    fn equals_const_indicator_tracks_the_variable() {
        let mut model = Model::new();
        let x = model.new_var(0, 2, "x").unwrap();
        let indicator = model.post_equals_const(x, 1).unwrap();

        let (solutions, _) = model.solve_all(&[x, indicator]).unwrap();
        assert_eq!(solutions.count(), 3);
        for s in 0..solutions.count() {
            let xv = solutions.value_at(s, x).unwrap();
            let iv = solutions.value_at(s, indicator).unwrap();
            assert_eq!(iv == 1, xv == 1);
        }
    }

    #[test]
    fn bool_sum_bounds_hold_in_every_solution() {
        let mut model = Model::new();
        let bools: Vec<_> = (0..4).map(|i| model.new_bool(format!("b{i}"))).collect();
        model
            .post_bool_sum(&bools, SumBound::AtLeast, 2)
            .unwrap();
        model.post_bool_sum(&bools, SumBound::AtMost, 3).unwrap();

        let (solutions, _) = model.solve_all(&bools).unwrap();
        // C(4,2) + C(4,3) = 6 + 4.
        assert_eq!(solutions.count(), 10);
        for s in 0..solutions.count() {
            let ones: i64 = solutions.assignment(s).unwrap().iter().sum();
            assert!((2..=3).contains(&ones));
        }
    }

    #[test]
    fn reified_equality_defers_until_both_sides_bind() {
        let mut model = Model::new();
        let a = model.new_var(0, 1, "a").unwrap();
        let b = model.new_var(0, 1, "b").unwrap();
        let indicator = model.post_reified_equality(a, b).unwrap();

        let (solutions, _) = model.solve_all(&[a, b, indicator]).unwrap();
        assert_eq!(solutions.count(), 4);
        for s in 0..solutions.count() {
            let av = solutions.value_at(s, a).unwrap();
            let bv = solutions.value_at(s, b).unwrap();
            let iv = solutions.value_at(s, indicator).unwrap();
            assert_eq!(iv == 1, av == bv);
        }
    }

    #[test]
    fn custom_value_ordering_flips_the_enumeration() {
        use crate::solver::heuristics::value::MaxValueFirst;

        let mut model = Model::new();
        let vars: Vec<_> = (0..3)
            .map(|i| model.new_var(0, 2, format!("v{i}")).unwrap())
            .collect();
        model.post_all_different(&vars).unwrap();

        let options = SolveOptions {
            value_selection: Box::new(MaxValueFirst),
            ..SolveOptions::default()
        };
        let (solutions, _) = model.solve_with(&vars, options).unwrap();
        assert_eq!(solutions.count(), 6);
        assert_eq!(solutions.assignment(0).unwrap(), &[2, 1, 0]);
    }

    #[test]
    fn hard_equality_restricts_both_sides() {
        let mut model = Model::new();
        let a = model.new_var(0, 3, "a").unwrap();
        let b = model.new_var(2, 5, "b").unwrap();
        model.post_equality(a, b).unwrap();

        let (solutions, _) = model.solve_all(&[a, b]).unwrap();
        assert_eq!(solutions.count(), 2);
        assert_eq!(solutions.assignment(0).unwrap(), &[2, 2]);
        assert_eq!(solutions.assignment(1).unwrap(), &[3, 3]);
    }
}
