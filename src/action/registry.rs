//! Action registry and dispatcher.

use super::builtin;
use super::context::{ActionContext, ActionOutcome, ActionStatus};
use super::error::ActionError;
use super::invocation::Invocation;
use crate::board::Point;
use crate::mode::ModeMachine;
use crate::session::EditorSession;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Handler signature shared by every action.
pub type ActionHandler = fn(&mut ActionContext<'_>, &[String]) -> Result<ActionOutcome, ActionError>;

/// A named, registered operation.
#[derive(Clone, Copy)]
pub struct Action {
    pub name: &'static str,
    /// Argument template shown in help, e.g. `(selector, value[, unit])`
    pub syntax: &'static str,
    pub help: &'static str,
    pub handler: ActionHandler,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

impl Action {
    pub fn usage(&self) -> String {
        format!("{}{}", self.name, self.syntax)
    }
}

/// Name → action table. Lookup is case-insensitive.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

static BUILTIN: LazyLock<ActionRegistry> = LazyLock::new(ActionRegistry::with_builtins);

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in action.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for action in builtin::ACTIONS {
            if let Err(err) = registry.register(*action) {
                warn!("Skipping built-in action: {}", err);
            }
        }
        registry
    }

    /// Shared, read-only registry of the built-in actions.
    pub fn builtin() -> &'static ActionRegistry {
        &BUILTIN
    }

    /// Adds an action.
    ///
    /// # Errors
    /// [`ActionError::DuplicateAction`] if the name is taken.
    pub fn register(&mut self, action: Action) -> Result<(), ActionError> {
        let key = action.name.to_ascii_lowercase();
        if self.actions.contains_key(&key) {
            return Err(ActionError::DuplicateAction(action.name.to_string()));
        }
        self.actions.insert(key, action);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Action> {
        self.actions.get(&name.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Registered actions sorted by name.
    pub fn actions(&self) -> Vec<&Action> {
        let mut all: Vec<&Action> = self.actions.values().collect();
        all.sort_by_key(|a| a.name);
        all
    }

    /// Runs action `name` with `args`.
    ///
    /// An unknown name returns [`ActionError::ActionNotFound`] without
    /// touching the session. Handlers parse and resolve every argument
    /// before opening their undo transaction, so argument errors leave the
    /// board unchanged too.
    pub fn execute(
        &self,
        session: &mut EditorSession,
        modes: &mut ModeMachine,
        name: &str,
        args: &[String],
        cursor: Point,
    ) -> Result<ActionOutcome, ActionError> {
        let Some(action) = self.lookup(name) else {
            debug!("Unknown action '{}'", name);
            return Err(ActionError::ActionNotFound(name.to_string()));
        };
        debug!("Executing {}({}) at {:?}", action.name, args.join(", "), cursor);

        let mut ctx = ActionContext {
            session,
            modes,
            cursor,
            action: action.name,
        };
        let result = (action.handler)(&mut ctx, args);

        match &result {
            Ok(outcome) if outcome.status == ActionStatus::NoObjectFound => {
                debug!("{}: no object found", action.name);
            }
            Ok(outcome) => debug!("{}: {}", action.name, outcome),
            Err(err) => warn!("{} failed: {}", action.name, err),
        }
        result
    }

    /// Parses and runs a single invocation string such as `ChangeSize(Selected, +1mil)`.
    pub fn execute_invocation(
        &self,
        session: &mut EditorSession,
        modes: &mut ModeMachine,
        invocation: &Invocation,
        cursor: Point,
    ) -> Result<ActionOutcome, ActionError> {
        self.execute(session, modes, &invocation.name, &invocation.args, cursor)
    }
}
