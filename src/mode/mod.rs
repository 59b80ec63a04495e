//! Interactive editing mode state machine.
//!
//! Exactly one [`EditorMode`] is active. Its handler owns the in-progress
//! construction (a pending start point, an ordered vertex list, an open
//! text entry). Pointer and key events go through the [`ModeMachine`],
//! which snaps coordinates, separates clicks from drags and routes to the
//! active handler.

pub mod editor_mode;
pub mod events;
pub mod handlers;
pub mod machine;
pub mod modifiers;

pub use editor_mode::EditorMode;
pub use events::{Key, ModeEvent, MouseButton};
pub use handlers::{ModeHandler, ModeResult};
pub use machine::{ModeMachine, ModeSettings};
pub use modifiers::Modifiers;

use crate::board::{BoardObjectRef, GeometryRejected, ObjectId, Point};
use crate::undo::UndoError;
use thiserror::Error;

/// Snapshot of the active mode's in-progress construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construction {
    /// Initial sub-state, nothing under construction
    Idle,
    /// Two-point modes after the first click
    PendingStart(Point),
    /// Polygon mode vertices, in input order
    Vertices(Vec<Point>),
    /// PolygonHole mode: target polygon and hole vertices so far
    Hole {
        target: ObjectId,
        vertices: Vec<Point>,
    },
    /// Open text entry
    Text { anchor: Point, text: String },
    /// Arrow mode drag in progress
    BoxSelect { from: Point, to: Point },
}

impl Construction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Construction::Idle)
    }
}

/// What an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Nothing changed
    Ignored,
    /// Construction state changed, nothing committed
    Updated,
    /// Objects were created or modified
    Committed(Vec<BoardObjectRef>),
    /// A single-click operation found no eligible object
    NoObjectFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("geometry rejected: {0}")]
    GeometryRejected(#[from] GeometryRejected),

    #[error("need at least {need} vertices to close, have {have}")]
    TooFewVertices { have: usize, need: usize },

    #[error(transparent)]
    Transaction(#[from] UndoError),
}

#[cfg(test)]
mod tests;
