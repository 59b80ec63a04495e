use super::invocation::InvocationError;
use super::value::ValueError;
use crate::board::GeometryRejected;
use crate::mode::ModeError;
use crate::session::SessionError;
use crate::undo::UndoError;
use thiserror::Error;

/// Failure of an action invocation.
///
/// `ActionNotFound`, `UnknownTarget`, `InvalidValue`, `InvalidArgument` and
/// `Syntax` are raised before anything is mutated. `GeometryRejected` may
/// follow earlier successful edits in the same batch; those stay applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    ActionNotFound(String),

    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    #[error("invalid value '{token}': {reason}")]
    InvalidValue { token: String, reason: ValueError },

    #[error("{action}: invalid argument '{argument}', expected {expected}")]
    InvalidArgument {
        action: String,
        argument: String,
        expected: String,
    },

    #[error("usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Syntax(#[from] InvocationError),

    #[error("{source} (stopped after {applied} target(s))")]
    GeometryRejected {
        /// Targets mutated before the rejection
        applied: usize,
        #[source]
        source: GeometryRejected,
    },

    /// Transaction protocol violation (nested begin) or undo while a
    /// transaction is open.
    #[error(transparent)]
    Transaction(#[from] UndoError),

    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error("action '{0}' is already registered")]
    DuplicateAction(String),
}

impl ActionError {
    pub(crate) fn invalid_argument(
        action: &str,
        argument: &str,
        expected: impl Into<String>,
    ) -> Self {
        ActionError::InvalidArgument {
            action: action.to_string(),
            argument: argument.to_string(),
            expected: expected.into(),
        }
    }
}

impl From<SessionError> for ActionError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownLayer(name) => {
                ActionError::invalid_argument("SetLayer", &name, "a layer name")
            }
            SessionError::Undo(err) => ActionError::Transaction(err),
        }
    }
}
