use crate::solver::engine::VariableId;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced to model-building client code.
///
/// Propagation-detected inconsistency is never represented here: an empty
/// domain during search is recovered by backtracking, and an unsatisfiable
/// model is reported as an empty [`SolutionSet`](crate::solver::collector::SolutionSet),
/// not as an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid range [{lo}, {hi}] for variable {name:?}")]
    InvalidVariableRange { name: String, lo: i64, hi: i64 },

    #[error("variable ?{0} is not part of this model")]
    UnknownVariable(VariableId),

    #[error("variable ?{0} was not registered for solution collection")]
    VariableNotCollected(VariableId),

    #[error("solution index {index} is out of range ({count} solutions collected)")]
    SolutionIndexOutOfRange { index: usize, count: usize },
}
