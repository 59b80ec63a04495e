//! Outer event router for the active editing mode.

use super::handlers::{ModeHandler, ModeResult, handler_for};
use super::{Construction, EditorMode, Key, ModeEvent, ModeOutcome, Modifiers, MouseButton};
use crate::board::{Coord, DirtyNotifier, Point};
use crate::session::EditorSession;
use log::{debug, info};

/// Pointer handling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSettings {
    /// Grid pitch pointer coordinates snap to (0 disables snapping)
    pub grid: Coord,
    /// Distance a press must travel before the release counts as a drag
    pub drag_threshold: Coord,
    /// Minimum vertices for polygons and holes
    pub min_polygon_vertices: usize,
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self {
            grid: 0,
            drag_threshold: 0,
            min_polygon_vertices: 3,
        }
    }
}

/// Routes events to the active mode handler.
///
/// The machine itself only tracks the pointer: the press origin of a
/// gesture in progress and the last known position. All construction state
/// lives in the handler, so replacing the handler on a mode switch discards
/// it.
#[derive(Debug)]
pub struct ModeMachine {
    handler: Box<dyn ModeHandler>,
    settings: ModeSettings,
    /// Snapped press origin while the primary button is held
    pressed: Option<Point>,
    /// Last snapped pointer position
    pointer: Point,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new(EditorMode::Arrow, ModeSettings::default())
    }
}

impl ModeMachine {
    /// Creates a machine with `mode` active in its initial sub-state.
    pub fn new(mode: EditorMode, settings: ModeSettings) -> Self {
        Self {
            handler: handler_for(mode, &settings),
            settings,
            pressed: None,
            pointer: Point::new(0, 0),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.handler.mode()
    }

    pub fn settings(&self) -> &ModeSettings {
        &self.settings
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Snapshot of the in-progress construction.
    pub fn construction(&self) -> Construction {
        if self.mode() == EditorMode::Arrow
            && let Some(from) = self.pressed
            && self.is_drag(from, self.pointer)
        {
            return Construction::BoxSelect {
                from,
                to: self.pointer,
            };
        }
        self.handler.construction()
    }

    /// Whether plain character keys should go to the handler as text.
    pub fn is_typing(&self) -> bool {
        matches!(self.handler.construction(), Construction::Text { .. })
    }

    /// Switches the active mode.
    ///
    /// The outgoing construction is discarded; the incoming mode starts in
    /// its initial sub-state. Selecting the already active mode is a no-op.
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, session: &mut EditorSession, mode: EditorMode) -> bool {
        if mode == self.mode() {
            debug!("Mode {} already active", mode);
            return false;
        }
        if !self.handler.construction().is_idle() {
            info!("Discarding {} construction on switch to {}", self.mode(), mode);
            session.dirty_mut().mark_dirty();
        }
        info!("Mode: {} -> {}", self.mode(), mode);
        self.handler = handler_for(mode, &self.settings);
        self.pressed = None;
        true
    }

    fn snap(&self, at: Point) -> Point {
        at.snap(self.settings.grid)
    }

    fn is_drag(&self, from: Point, to: Point) -> bool {
        from != to && from.distance(to) > self.settings.drag_threshold as f64
    }

    fn track(&mut self, session: &mut EditorSession, at: Point) -> Point {
        let at = self.snap(at);
        self.pointer = at;
        session.cursor = at;
        at
    }

    fn finish(&self, session: &mut EditorSession, result: ModeResult) -> ModeResult {
        if matches!(result, Ok(ModeOutcome::Updated)) {
            session.dirty_mut().mark_dirty();
        }
        result
    }

    /// Dispatches one event.
    pub fn handle(
        &mut self,
        session: &mut EditorSession,
        event: ModeEvent,
        modifiers: Modifiers,
    ) -> ModeResult {
        match event {
            ModeEvent::Press { at, button } => self.on_press(session, button, at),
            ModeEvent::Motion { at } => self.on_motion(session, at),
            ModeEvent::Release { at, button } => self.on_release(session, button, at, modifiers),
            ModeEvent::Cancel => self.cancel(session),
            ModeEvent::Close => self.close(session),
            ModeEvent::Key(key) => self.on_key(session, key),
        }
    }

    /// Processes a pointer button press.
    ///
    /// # Behavior
    /// - Left: records the press origin; the gesture completes on release
    /// - Right: cancels the current construction
    pub fn on_press(
        &mut self,
        session: &mut EditorSession,
        button: MouseButton,
        at: Point,
    ) -> ModeResult {
        let at = self.track(session, at);
        match button {
            MouseButton::Left => {
                self.pressed = Some(at);
                Ok(ModeOutcome::Ignored)
            }
            MouseButton::Right => self.cancel(session),
            MouseButton::Middle => Ok(ModeOutcome::Ignored),
        }
    }

    /// Processes pointer motion. Only affects previews.
    pub fn on_motion(&mut self, session: &mut EditorSession, at: Point) -> ModeResult {
        let before = self.pointer;
        let at = self.track(session, at);
        if at == before {
            return Ok(ModeOutcome::Ignored);
        }
        if self.pressed.is_some() || !self.handler.construction().is_idle() {
            session.dirty_mut().mark_dirty();
            return Ok(ModeOutcome::Updated);
        }
        Ok(ModeOutcome::Ignored)
    }

    /// Processes a pointer button release, completing a click or drag.
    ///
    /// A release within the drag threshold of the press is a click at the
    /// press point; anything further is a drag.
    pub fn on_release(
        &mut self,
        session: &mut EditorSession,
        button: MouseButton,
        at: Point,
        modifiers: Modifiers,
    ) -> ModeResult {
        if button != MouseButton::Left {
            return Ok(ModeOutcome::Ignored);
        }
        let at = self.track(session, at);
        let Some(origin) = self.pressed.take() else {
            debug!("Release without press ignored");
            return Ok(ModeOutcome::Ignored);
        };

        let result = if self.is_drag(origin, at) {
            debug!("{} drag {:?} -> {:?}", self.mode(), origin, at);
            self.handler.drag(session, origin, at, modifiers)
        } else {
            debug!("{} click {:?}", self.mode(), origin);
            self.handler.click(session, origin, modifiers)
        };
        self.finish(session, result)
    }

    /// Convenience for a press and release at the same point.
    pub fn click(
        &mut self,
        session: &mut EditorSession,
        at: Point,
        modifiers: Modifiers,
    ) -> ModeResult {
        self.on_press(session, MouseButton::Left, at)?;
        self.on_release(session, MouseButton::Left, at, modifiers)
    }

    /// Discards the construction and any gesture in progress.
    pub fn cancel(&mut self, session: &mut EditorSession) -> ModeResult {
        let dragging = self.pressed.take().is_some();
        if self.handler.cancel() || dragging {
            debug!("{} construction cancelled", self.mode());
            session.dirty_mut().mark_dirty();
            Ok(ModeOutcome::Updated)
        } else {
            Ok(ModeOutcome::Ignored)
        }
    }

    /// Delivers a close event to the active mode.
    pub fn close(&mut self, session: &mut EditorSession) -> ModeResult {
        let result = self.handler.close(session);
        self.finish(session, result)
    }

    /// Drops the last vertex of a multi-point construction.
    pub fn previous_point(&mut self, session: &mut EditorSession) -> ModeResult {
        if self.handler.previous_point() {
            session.dirty_mut().mark_dirty();
            Ok(ModeOutcome::Updated)
        } else {
            Ok(ModeOutcome::Ignored)
        }
    }

    /// Delivers a key to the active mode. Escape always cancels.
    pub fn on_key(&mut self, session: &mut EditorSession, key: Key) -> ModeResult {
        if key == Key::Escape {
            return self.cancel(session);
        }
        let result = self.handler.key(session, key);
        self.finish(session, result)
    }
}
