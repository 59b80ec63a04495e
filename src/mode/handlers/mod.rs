//! One handler type per editing mode.
//!
//! Each handler owns the in-progress construction for its mode and is
//! constructible and testable on its own. The [`ModeMachine`](super::ModeMachine)
//! only routes events to the active handler.

mod arrow;
mod click;
mod polygon;
mod segment;
mod text;

pub use arrow::ArrowHandler;
pub use click::{LockHandler, ThermalHandler, ViaHandler};
pub use polygon::{HoleHandler, PolygonHandler};
pub use segment::{ArcHandler, LineHandler, RectangleHandler};
pub use text::TextHandler;

use super::editor_mode::EditorMode;
use super::events::Key;
use super::modifiers::Modifiers;
use super::{Construction, ModeError, ModeOutcome, ModeSettings};
use crate::board::{BoardObjectRef, FlagId, GeometryRejected, Point, mutate};
use crate::session::EditorSession;
use log::warn;
use std::fmt;

pub type ModeResult = Result<ModeOutcome, ModeError>;

/// Gesture interpretation for one editing mode.
pub trait ModeHandler: fmt::Debug {
    fn mode(&self) -> EditorMode;

    /// A press and release without a drag, at `at`.
    fn click(&mut self, session: &mut EditorSession, at: Point, modifiers: Modifiers)
    -> ModeResult;

    /// A press at `from` released at `to` beyond the drag threshold.
    ///
    /// Modes without drag semantics treat it as a click at the release point.
    fn drag(
        &mut self,
        session: &mut EditorSession,
        from: Point,
        to: Point,
        modifiers: Modifiers,
    ) -> ModeResult {
        let _ = from;
        self.click(session, to, modifiers)
    }

    /// Explicit close event for multi-point constructions.
    fn close(&mut self, session: &mut EditorSession) -> ModeResult {
        let _ = session;
        Ok(ModeOutcome::Ignored)
    }

    /// Key press not consumed by a keybinding.
    fn key(&mut self, session: &mut EditorSession, key: Key) -> ModeResult {
        let _ = (session, key);
        Ok(ModeOutcome::Ignored)
    }

    /// Drops the most recent vertex. Returns whether one was dropped.
    fn previous_point(&mut self) -> bool {
        false
    }

    /// Discards the construction. Returns whether there was anything to discard.
    fn cancel(&mut self) -> bool;

    /// Snapshot of the in-progress construction.
    fn construction(&self) -> Construction;
}

/// Builds the handler for `mode` in its initial sub-state.
pub fn handler_for(mode: EditorMode, settings: &ModeSettings) -> Box<dyn ModeHandler> {
    match mode {
        EditorMode::Arrow => Box::new(ArrowHandler::new()),
        EditorMode::Via => Box::new(ViaHandler::new()),
        EditorMode::Line => Box::new(LineHandler::new()),
        EditorMode::Arc => Box::new(ArcHandler::new()),
        EditorMode::Rectangle => Box::new(RectangleHandler::new()),
        EditorMode::Text => Box::new(TextHandler::new()),
        EditorMode::Polygon => Box::new(PolygonHandler::new(settings.min_polygon_vertices)),
        EditorMode::PolygonHole => Box::new(HoleHandler::new(settings.min_polygon_vertices)),
        EditorMode::Lock => Box::new(LockHandler::new()),
        EditorMode::Thermal => Box::new(ThermalHandler::new()),
    }
}

/// Runs one creation inside its own undo transaction.
///
/// A rejection is logged and returned; the caller still advances its
/// construction state because the gesture has been consumed.
pub(crate) fn commit<F>(session: &mut EditorSession, create: F) -> ModeResult
where
    F: FnOnce(&mut EditorSession) -> Result<Vec<BoardObjectRef>, GeometryRejected>,
{
    let mut tx = session.begin_transaction()?;
    match create(&mut *tx) {
        Ok(created) => Ok(ModeOutcome::Committed(created)),
        Err(err) => {
            warn!("Geometry rejected: {}", err);
            Err(ModeError::GeometryRejected(err))
        }
    }
}

/// Sets or clears one flag on a board object. Returns the reference when
/// the object changed.
pub(crate) fn set_object_flag(
    session: &mut EditorSession,
    target: BoardObjectRef,
    flag: FlagId,
    on: bool,
) -> Option<BoardObjectRef> {
    let object = session.object(target.container, target.id)?;
    let updated = mutate::set_flag(object, flag, on)?;
    session
        .replace_object(target.container, updated)
        .then_some(target)
}
