//! Named editing actions and their dispatcher.
//!
//! An action is invoked by name with string arguments, e.g.
//! `ChangeSize(Selected, +2, mil)`. The registry maps the name to a
//! handler; the handler resolves a [`TargetSelector`] to concrete objects,
//! parses any [`ValueSpec`] and applies the edit inside one undo
//! transaction.

mod builtin;
pub mod context;
pub mod error;
pub mod invocation;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod value;

pub use context::{ActionContext, ActionOutcome, ActionStatus};
pub use error::ActionError;
pub use invocation::{Invocation, InvocationError};
pub use registry::{Action, ActionHandler, ActionRegistry};
pub use selector::TargetSelector;
pub use value::{ResolvedValue, ValueError, ValueMode, ValueSpec};
