use crate::board::Point;
use crate::mode::ModeMachine;
use crate::session::EditorSession;
use std::fmt;

/// Everything an action handler may touch during one invocation.
pub struct ActionContext<'a> {
    pub session: &'a mut EditorSession,
    pub modes: &'a mut ModeMachine,
    /// Cursor position the invocation resolves `Object` against
    pub cursor: Point,
    /// Registered name of the running action, for messages
    pub action: &'static str,
}

/// Whether an invocation did anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The action ran. `mutated` may still be zero (e.g. every target already
    /// had the requested value).
    Applied,
    /// Target resolution came back empty. A successful no-op.
    NoObjectFound,
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    /// Number of objects changed
    pub mutated: usize,
    /// Extra detail for the user (skipped locked objects, new mode, ...)
    pub message: Option<String>,
}

impl ActionOutcome {
    pub fn applied(mutated: usize) -> Self {
        Self {
            status: ActionStatus::Applied,
            mutated,
            message: None,
        }
    }

    pub fn nothing_found() -> Self {
        Self {
            status: ActionStatus::NoObjectFound,
            mutated: 0,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ActionStatus::Applied => write!(f, "{} object(s) changed", self.mutated)?,
            ActionStatus::NoObjectFound => f.write_str("no object found")?,
        }
        if let Some(message) = &self.message {
            write!(f, "; {message}")?;
        }
        Ok(())
    }
}
