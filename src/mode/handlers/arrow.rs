//! Arrow mode: click and box selection.

use super::{ModeHandler, ModeResult, set_object_flag};
use crate::action::resolver::resolve_at_cursor;
use crate::board::{BoardObjectRef, Container, FlagId, KindMask, ObjectId, Point, Rect};
use crate::mode::{Construction, EditorMode, ModeOutcome, Modifiers};
use crate::session::EditorSession;
use log::debug;

/// Arrow mode handler.
///
/// - Click selects the topmost object and clears the rest of the selection.
/// - Shift+click toggles the clicked object within the selection.
/// - Click on empty space clears the selection.
/// - Drag selects every object fully inside the box (Shift keeps the rest).
#[derive(Debug, Default)]
pub struct ArrowHandler;

impl ArrowHandler {
    pub fn new() -> Self {
        Self
    }
}

/// Replaces the selection with `keep` (or adds to it when `extend` is set).
fn apply_selection(session: &mut EditorSession, keep: &[ObjectId], extend: bool) -> ModeResult {
    let mut changed: Vec<BoardObjectRef> = Vec::new();
    let mut tx = session.begin_transaction()?;

    if !extend {
        for id in tx.board.selected(KindMask::ALL) {
            if keep.contains(&id) {
                continue;
            }
            let Some(object) = tx.board.get(id) else {
                continue;
            };
            let target = BoardObjectRef::of(Container::Board, object);
            changed.extend(set_object_flag(&mut tx, target, FlagId::Selected, false));
        }
    }
    for id in keep {
        let Some(object) = tx.board.get(*id) else {
            continue;
        };
        let target = BoardObjectRef::of(Container::Board, object);
        changed.extend(set_object_flag(&mut tx, target, FlagId::Selected, true));
    }

    Ok(if changed.is_empty() {
        ModeOutcome::Ignored
    } else {
        ModeOutcome::Committed(changed)
    })
}

impl ModeHandler for ArrowHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Arrow
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, modifiers: Modifiers) -> ModeResult {
        let hit = resolve_at_cursor(session, at, KindMask::ALL);
        match (hit, modifiers.extends_selection()) {
            (Some(target), true) => {
                let selected = session
                    .object(target.container, target.id)
                    .is_some_and(|o| o.is_selected());
                let mut tx = session.begin_transaction()?;
                Ok(
                    match set_object_flag(&mut tx, target, FlagId::Selected, !selected) {
                        Some(changed) => ModeOutcome::Committed(vec![changed]),
                        None => ModeOutcome::Ignored,
                    },
                )
            }
            (Some(target), false) => apply_selection(session, &[target.id], false),
            (None, true) => Ok(ModeOutcome::NoObjectFound),
            (None, false) => {
                debug!("Click on empty space clears the selection");
                match apply_selection(session, &[], false)? {
                    ModeOutcome::Ignored => Ok(ModeOutcome::NoObjectFound),
                    outcome => Ok(outcome),
                }
            }
        }
    }

    fn drag(
        &mut self,
        session: &mut EditorSession,
        from: Point,
        to: Point,
        modifiers: Modifiers,
    ) -> ModeResult {
        let area = Rect::from_corners(from, to);
        let inside = session.board.inside(&area);
        debug!("Box select {:?} found {} object(s)", area, inside.len());
        apply_selection(session, &inside, modifiers.extends_selection())
    }

    fn cancel(&mut self) -> bool {
        false
    }

    fn construction(&self) -> Construction {
        Construction::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm(v: i64) -> i64 {
        v * 1_000_000
    }

    fn shift() -> Modifiers {
        Modifiers {
            shift: true,
            ..Modifiers::new()
        }
    }

    fn two_vias() -> (EditorSession, ObjectId, ObjectId) {
        let mut session = EditorSession::default();
        let a = session.create_via(Point::new(mm(10), mm(10))).unwrap().id;
        let b = session.create_via(Point::new(mm(20), mm(10))).unwrap().id;
        (session, a, b)
    }

    #[test]
    fn click_replaces_selection() {
        let (mut session, a, b) = two_vias();
        let mut handler = ArrowHandler::new();
        handler
            .click(&mut session, Point::new(mm(10), mm(10)), Modifiers::new())
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL), vec![a]);
        handler
            .click(&mut session, Point::new(mm(20), mm(10)), Modifiers::new())
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL), vec![b]);
    }

    #[test]
    fn shift_click_toggles() {
        let (mut session, a, b) = two_vias();
        let mut handler = ArrowHandler::new();
        handler
            .click(&mut session, Point::new(mm(10), mm(10)), shift())
            .unwrap();
        handler
            .click(&mut session, Point::new(mm(20), mm(10)), shift())
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL), vec![a, b]);
        handler
            .click(&mut session, Point::new(mm(10), mm(10)), shift())
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL), vec![b]);
    }

    #[test]
    fn empty_click_clears() {
        let (mut session, _, _) = two_vias();
        let mut handler = ArrowHandler::new();
        handler
            .drag(
                &mut session,
                Point::new(mm(5), mm(5)),
                Point::new(mm(25), mm(15)),
                Modifiers::new(),
            )
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL).len(), 2);
        let outcome = handler
            .click(&mut session, Point::new(mm(50), mm(50)), Modifiers::new())
            .unwrap();
        assert!(matches!(outcome, ModeOutcome::Committed(ref refs) if refs.len() == 2));
        assert!(session.board.selected(KindMask::ALL).is_empty());
        assert_eq!(
            handler
                .click(&mut session, Point::new(mm(50), mm(50)), Modifiers::new())
                .unwrap(),
            ModeOutcome::NoObjectFound
        );
    }

    #[test]
    fn box_select_only_takes_objects_fully_inside() {
        let (mut session, a, _) = two_vias();
        let mut handler = ArrowHandler::new();
        handler
            .drag(
                &mut session,
                Point::new(mm(5), mm(5)),
                Point::new(mm(15), mm(15)),
                Modifiers::new(),
            )
            .unwrap();
        assert_eq!(session.board.selected(KindMask::ALL), vec![a]);
    }
}
