//! Weekly nurse rostering.
//!
//! The schedule is modelled twice: a staff view (`shift[nurse][day]`, which
//! shift each nurse works, 0 meaning rest) and a duty view
//! (`nurse[shift][day]`, which nurse covers each shift). The two views are
//! never synchronised by hand; per day, an element relation
//! `duty_column[shift[nurse][day]] == nurse` is the single link between
//! them, and an all-different over each column makes both views daily
//! permutations.
//!
//! On top of the linked views:
//! - every nurse works between `min_work_days` and `max_work_days` days,
//! - at most `max_nurses_per_shift` distinct nurses cover each nonzero
//!   shift over the week,
//! - shifts numbered 2 and up are worked on consecutive days: in every
//!   wrap-around three-day window at least one adjacent pair of days is
//!   covered by the same nurse.
//!
//! The decision variables are the staff view flattened nurse-major /
//! day-minor, so with the default policies the enumeration order (and the
//! regression counts below) are exactly reproducible.

use crate::{
    error::Result,
    model::{Model, SolveOptions, SumBound},
    solver::{
        collector::SolutionSet,
        engine::{SearchStats, VariableId},
    },
};

/// How to post the consecutive-day constraint for shifts numbered >= 2.
///
/// `AdjacentWindows` is the two-disjunct form: in the window starting at
/// day `d`, either days `d, d+1` or days `d+1, d+2` share the nurse.
/// `ThreeWayWindows` additionally accepts the split pair `d, d+2`, so a
/// nurse covering the first and last day of a window also counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingMode {
    AdjacentWindows,
    ThreeWayWindows,
}

/// Instance parameters. Shift 0 is the rest "shift".
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub nurses: usize,
    pub shifts: usize,
    pub days: usize,
    pub min_work_days: i64,
    pub max_work_days: i64,
    pub max_nurses_per_shift: i64,
    pub pairing: PairingMode,
}

impl Default for RosterConfig {
    /// Four nurses, three real shifts plus rest, one week.
    fn default() -> Self {
        Self {
            nurses: 4,
            shifts: 4,
            days: 7,
            min_work_days: 5,
            max_work_days: 6,
            max_nurses_per_shift: 2,
            pairing: PairingMode::AdjacentWindows,
        }
    }
}

/// A built rostering model, ready to solve.
#[derive(Debug)]
pub struct Roster {
    model: Model,
    config: RosterConfig,
    shift_vars: Vec<VariableId>,
}

impl Roster {
    /// Builds the model for `config`.
    pub fn build(config: RosterConfig) -> Result<Self> {
        let mut model = Model::new();
        let nurses = config.nurses;
        let shifts = config.shifts;
        let days = config.days;

        // Staff view, nurse-major / day-minor: these are the decision
        // variables, in the order the default policy branches on them.
        let mut shift_vars = Vec::with_capacity(nurses * days);
        for nurse in 0..nurses {
            for day in 0..days {
                shift_vars.push(model.new_var(
                    0,
                    shifts as i64 - 1,
                    format!("shift[n{nurse} d{day}]"),
                )?);
            }
        }

        // Duty view, shift-major / day-minor.
        let mut duty_vars = Vec::with_capacity(shifts * days);
        for shift in 0..shifts {
            for day in 0..days {
                duty_vars.push(model.new_var(
                    0,
                    nurses as i64 - 1,
                    format!("nurse[s{shift} d{day}]"),
                )?);
            }
        }
        let duty = |shift: usize, day: usize| duty_vars[shift * days + day];

        // One singleton per nurse index, the element targets.
        let nurse_index: Vec<VariableId> = (0..nurses)
            .map(|nurse| model.new_var(nurse as i64, nurse as i64, format!("#{nurse}")))
            .collect::<Result<_>>()?;

        for day in 0..days {
            let staff_column: Vec<VariableId> = (0..nurses)
                .map(|nurse| shift_vars[nurse * days + day])
                .collect();
            let duty_column: Vec<VariableId> = (0..shifts).map(|shift| duty(shift, day)).collect();

            model.post_all_different(&staff_column)?;
            model.post_all_different(&duty_column)?;

            // duty_column[shift of nurse] == nurse keeps the views in sync.
            for nurse in 0..nurses {
                model.post_element(staff_column[nurse], &duty_column, nurse_index[nurse])?;
            }
        }

        // Work-load bounds per nurse: a nurse is on duty when the shift
        // code is nonzero.
        for nurse in 0..nurses {
            let on_duty: Vec<VariableId> = (0..days)
                .map(|day| model.post_positive(shift_vars[nurse * days + day]))
                .collect::<Result<_>>()?;
            model.post_bool_sum(&on_duty, SumBound::AtLeast, config.min_work_days)?;
            model.post_bool_sum(&on_duty, SumBound::AtMost, config.max_work_days)?;
        }

        // Weekly cover: "nurse n ever works shift s" as a reified OR over
        // the per-day equality indicators, then a cap per real shift.
        for shift in 1..shifts {
            let mut covers = Vec::with_capacity(nurses);
            for nurse in 0..nurses {
                let daily: Vec<VariableId> = (0..days)
                    .map(|day| model.post_equals_const(shift_vars[nurse * days + day], shift as i64))
                    .collect::<Result<_>>()?;
                let works = model.new_bool(format!("works[n{nurse} s{shift}]"));
                model.post_reified_or(works, &daily)?;
                covers.push(works);
            }
            model.post_bool_sum(&covers, SumBound::AtMost, config.max_nurses_per_shift)?;
        }

        // Consecutive-day pairing for shifts >= 2. Windows wrap around the
        // end of the week; they degenerate below three days.
        if days >= 3 {
            for shift in 2..shifts {
                let adjacent: Vec<VariableId> = (0..days)
                    .map(|day| {
                        model.post_reified_equality(duty(shift, day), duty(shift, (day + 1) % days))
                    })
                    .collect::<Result<_>>()?;
                for day in 0..days {
                    match config.pairing {
                        PairingMode::AdjacentWindows => {
                            model.post_or(&[adjacent[day], adjacent[(day + 1) % days]])?
                        }
                        PairingMode::ThreeWayWindows => {
                            let split = model.post_reified_equality(
                                duty(shift, day),
                                duty(shift, (day + 2) % days),
                            )?;
                            model.post_or(&[adjacent[day], adjacent[(day + 1) % days], split])?
                        }
                    }
                }
            }
        }

        Ok(Self {
            model,
            config,
            shift_vars,
        })
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The staff view, nurse-major / day-minor. Solutions are snapshots of
    /// exactly these variables in this order.
    pub fn decision(&self) -> &[VariableId] {
        &self.shift_vars
    }

    /// The shift variable for one nurse on one day.
    pub fn shift_var(&self, nurse: usize, day: usize) -> VariableId {
        self.shift_vars[nurse * self.config.days + day]
    }

    pub fn solve_all(&self) -> Result<(SolutionSet, SearchStats)> {
        self.model.solve_all(&self.shift_vars)
    }

    pub fn solve_first(&self) -> Result<(SolutionSet, SearchStats)> {
        self.model.solve_first(&self.shift_vars)
    }

    pub fn solve_with(&self, options: SolveOptions) -> Result<(SolutionSet, SearchStats)> {
        self.model.solve_with(&self.shift_vars, options)
    }
}
