//! Board object graph and the collaborators the editing core consumes.
//!
//! This module defines the data the dispatcher and mode machine operate on:
//! - [`Board`]: the object store (also used for the paste buffer)
//! - [`ObjectShape`] / [`ObjectKind`]: the closed set of object kinds
//! - [`ObjectCreator`]: validation of new geometry before it is inserted
//! - [`mutate`]: per-kind attribute mutators
//! - [`DirtyTracker`]: repaint notifications for an external renderer

#[allow(clippy::module_inception)]
pub mod board;
pub mod buffer;
pub mod create;
pub mod dirty;
pub mod geometry;
pub mod mutate;
pub mod object;

pub use board::{Board, Layer};
pub use buffer::PasteBuffer;
pub use create::{GeometryRejected, ObjectCreator, ValidatingCreator};
pub use dirty::{DirtyNotifier, DirtyTracker};
pub use geometry::{Coord, MAX_COORD, Point, Rect};
pub use object::{
    ArcData, BoardObject, ElementData, FlagId, KindMask, LayerId, LineData, ObjectFlags, ObjectId,
    ObjectKind, ObjectShape, PadData, PolygonData, TextData, ViaData,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which object store a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    /// The board being edited
    Board,
    /// The paste buffer
    Buffer,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Board => f.write_str("board"),
            Container::Buffer => f.write_str("buffer"),
        }
    }
}

/// Handle to a found object plus its ownership chain.
///
/// Never owns the object; it is a lookup key that stays meaningful only for
/// the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardObjectRef {
    pub container: Container,
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Owning element (pads only)
    pub owner: Option<ObjectId>,
    /// Layer the object (or its owner) sits on
    pub layer: Option<LayerId>,
}

impl BoardObjectRef {
    /// Builds a reference for a stored object.
    pub fn of(container: Container, object: &BoardObject) -> Self {
        Self {
            container,
            id: object.id,
            kind: object.kind(),
            owner: object.owner,
            layer: object.layer,
        }
    }

    /// Ownership chain from the object outwards: the object itself, then its owner.
    pub fn chain(&self) -> impl Iterator<Item = ObjectId> {
        std::iter::once(self.id).chain(self.owner)
    }
}

impl fmt::Display for BoardObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.id, self.container)?;
        if let Some(owner) = self.owner {
            write!(f, " in element {owner}")?;
        }
        Ok(())
    }
}
