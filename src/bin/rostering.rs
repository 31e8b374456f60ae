//! Command-line front-end for the nurse rostering model: builds the
//! instance, enumerates schedules and prints a few of them.

use std::error::Error;

use clap::Parser;
use prettytable::{Cell, Row, Table};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rota::{
    model::SolveOptions,
    problems::rostering::{PairingMode, Roster, RosterConfig},
    solver::{collector::SolutionSet, engine::SolveLimit, stats::render_stats_table},
};

#[derive(Parser, Debug)]
#[command(name = "rostering", version, about = "Enumerates weekly nurse rosters")]
struct Args {
    #[arg(long, default_value_t = 4)]
    nurses: usize,
    /// Number of shift codes, rest included (shift 0 is rest).
    #[arg(long, default_value_t = 4)]
    shifts: usize,
    #[arg(long, default_value_t = 7)]
    days: usize,
    #[arg(long, default_value_t = 5)]
    min_work_days: i64,
    #[arg(long, default_value_t = 6)]
    max_work_days: i64,
    #[arg(long, default_value_t = 2)]
    max_nurses_per_shift: i64,
    /// Also accept the split pair (days d and d+2) in the consecutive-day
    /// windows.
    #[arg(long)]
    three_way_pairing: bool,
    /// Stop after this many solutions.
    #[arg(long)]
    max_solutions: Option<u64>,
    /// Solution indices to print as schedules.
    #[arg(long, value_delimiter = ',', default_value = "0")]
    sample: Vec<usize>,
    /// Emit the whole solution set as JSON instead of tables.
    #[arg(long)]
    json: bool,
    /// Print per-constraint propagation statistics.
    #[arg(long)]
    stats: bool,
}

fn schedule_table(solutions: &SolutionSet, solution: usize, roster: &Roster) -> rota::error::Result<Table> {
    let config = roster.config();
    let mut table = Table::new();

    let mut header = vec![Cell::new("")];
    header.extend((0..config.days).map(|day| Cell::new(&format!("day {day}"))));
    table.add_row(Row::new(header));

    for nurse in 0..config.nurses {
        let mut row = vec![Cell::new(&format!("nurse {nurse}"))];
        for day in 0..config.days {
            let shift = solutions.value_at(solution, roster.shift_var(nurse, day))?;
            let code = if shift == 0 {
                "-".to_string()
            } else {
                shift.to_string()
            };
            row.push(Cell::new(&code));
        }
        table.add_row(Row::new(row));
    }
    Ok(table)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let config = RosterConfig {
        nurses: args.nurses,
        shifts: args.shifts,
        days: args.days,
        min_work_days: args.min_work_days,
        max_work_days: args.max_work_days,
        max_nurses_per_shift: args.max_nurses_per_shift,
        pairing: if args.three_way_pairing {
            PairingMode::ThreeWayWindows
        } else {
            PairingMode::AdjacentWindows
        },
    };
    info!(?config, "building roster model");

    let roster = Roster::build(config)?;
    let options = SolveOptions {
        limit: SolveLimit {
            max_solutions: args.max_solutions,
            deadline: None,
        },
        ..SolveOptions::default()
    };
    let (solutions, stats) = roster.solve_with(options)?;
    info!(
        nodes = stats.nodes_visited,
        backtracks = stats.backtracks,
        "search finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solutions)?);
    } else {
        println!("{} schedules found", solutions.count());
        for &index in &args.sample {
            if index >= solutions.count() {
                continue;
            }
            println!("\nschedule {index}:");
            schedule_table(&solutions, index, &roster)?.printstd();
        }
    }

    if args.stats {
        println!("{}", render_stats_table(&stats, roster.model().constraints()));
    }
    Ok(())
}
