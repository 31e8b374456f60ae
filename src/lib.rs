//! rota is a finite-domain constraint solver built around exhaustive
//! enumeration: declare integer variables, post constraints over them, and
//! enumerate every assignment that satisfies all of them.
//!
//! The engine interleaves constraint propagation (each propagator shrinks
//! variable domains until no constraint can prune further) with depth-first
//! backtracking search over the declared decision variables. Undo is done
//! with a change trail, so backtracking costs only the changes made below
//! the abandoned node. With the default first-unbound / minimum-value
//! policies the enumeration order is deterministic and reproducible.
//!
//! # Example
//!
//! Three variables over `{0, 1, 2}` that must be pairwise distinct have
//! exactly the six permutations as solutions:
//!
//! ```
//! use rota::model::Model;
//!
//! let mut model = Model::new();
//! let vars: Vec<_> = (0..3)
//!     .map(|i| model.new_var(0, 2, format!("v{i}")))
//!     .collect::<Result<_, _>>()?;
//! model.post_all_different(&vars)?;
//!
//! let (solutions, stats) = model.solve_all(&vars)?;
//! assert_eq!(solutions.count(), 6);
//! assert_eq!(solutions.assignment(0)?, &[0, 1, 2]);
//! assert_eq!(stats.solutions, 6);
//! # Ok::<(), rota::error::Error>(())
//! ```
//!
//! The [`problems`] module carries a ready-made nurse rostering model; the
//! `rostering` binary wraps it in a CLI.

pub mod error;
pub mod model;
pub mod problems;
pub mod solver;
