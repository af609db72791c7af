use thiserror::Error;

/// Failures reported by collaborators or detected by the cycle.
///
/// None of these are fatal to the agent: the cycle logs them and tries again on a later tick.
#[derive(Debug, Error)]
pub enum PsiError {
    #[error("no reference registered under '{0}'")]
    MissingReference(String),

    #[error("unknown procedure '{0}'")]
    UnknownProcedure(String),

    #[error("procedure '{name}' could not be started: {reason}")]
    Procedure { name: String, reason: String },

    #[error("failed to evaluate '{expression}': {reason}")]
    Eval { expression: String, reason: String },

    #[error("planner failed: {0}")]
    Planner(String),

    #[error("action {0} is still in flight")]
    ActionInFlight(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type PsiResult<T> = Result<T, PsiError>;
