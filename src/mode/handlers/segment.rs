//! Two-point modes: Line, Arc and Rectangle.
//!
//! The first click records a pending start point. Every further click
//! commits from the pending point to the new one and re-enters the pending
//! state at the new point, so segments chain until cancel or mode switch.

use super::{ModeHandler, ModeResult, commit};
use crate::board::{BoardObjectRef, GeometryRejected, Point};
use crate::mode::{Construction, EditorMode, ModeOutcome, Modifiers};
use crate::session::EditorSession;

type Create = fn(&mut EditorSession, Point, Point) -> Result<BoardObjectRef, GeometryRejected>;

fn chain_click(
    start: &mut Option<Point>,
    session: &mut EditorSession,
    at: Point,
    create: Create,
) -> ModeResult {
    match start.replace(at) {
        None => Ok(ModeOutcome::Updated),
        Some(from) => commit(session, |s| create(s, from, at).map(|r| vec![r])),
    }
}

fn chain_drag(
    start: &mut Option<Point>,
    session: &mut EditorSession,
    from: Point,
    to: Point,
    create: Create,
) -> ModeResult {
    start.get_or_insert(from);
    chain_click(start, session, to, create)
}

fn pending(start: &Option<Point>) -> Construction {
    match start {
        Some(p) => Construction::PendingStart(*p),
        None => Construction::Idle,
    }
}

macro_rules! two_point_handler {
    ($(#[$doc:meta])* $name:ident, $mode:expr, $create:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            start: Option<Point>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl ModeHandler for $name {
            fn mode(&self) -> EditorMode {
                $mode
            }

            fn click(
                &mut self,
                session: &mut EditorSession,
                at: Point,
                _modifiers: Modifiers,
            ) -> ModeResult {
                chain_click(&mut self.start, session, at, $create)
            }

            fn drag(
                &mut self,
                session: &mut EditorSession,
                from: Point,
                to: Point,
                _modifiers: Modifiers,
            ) -> ModeResult {
                chain_drag(&mut self.start, session, from, to, $create)
            }

            fn cancel(&mut self) -> bool {
                self.start.take().is_some()
            }

            fn construction(&self) -> Construction {
                pending(&self.start)
            }
        }
    };
}

two_point_handler!(
    /// Line mode: chained straight segments.
    LineHandler,
    EditorMode::Line,
    EditorSession::create_line
);

two_point_handler!(
    /// Arc mode: chained quarter arcs.
    ArcHandler,
    EditorMode::Arc,
    EditorSession::create_arc
);

two_point_handler!(
    /// Rectangle mode: each pair of corners becomes a rectangular polygon.
    RectangleHandler,
    EditorMode::Rectangle,
    EditorSession::create_rectangle
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ObjectKind, ObjectShape};
    use crate::mode::ModeError;

    fn mm(v: i64) -> i64 {
        v * 1_000_000
    }

    #[test]
    fn line_chains_from_the_last_point() {
        let mut session = EditorSession::default();
        let mut handler = LineHandler::new();
        let none = Modifiers::new();
        let points = [(1, 1), (5, 1), (5, 5)].map(|(x, y)| Point::new(mm(x), mm(y)));

        assert_eq!(
            handler.click(&mut session, points[0], none),
            Ok(ModeOutcome::Updated)
        );
        assert!(matches!(
            handler.click(&mut session, points[1], none),
            Ok(ModeOutcome::Committed(_))
        ));
        handler.click(&mut session, points[2], none).unwrap();

        assert_eq!(session.board.count_kind(ObjectKind::Line), 2);
        assert_eq!(handler.construction(), Construction::PendingStart(points[2]));
        assert_eq!(session.undo_log().depth(), 2);
    }

    #[test]
    fn rejected_segment_still_moves_the_pending_point() {
        let mut session = EditorSession::default();
        let mut handler = LineHandler::new();
        let none = Modifiers::new();
        let p = Point::new(mm(1), mm(1));
        handler.click(&mut session, p, none).unwrap();
        let err = handler.click(&mut session, p, none).unwrap_err();
        assert!(matches!(err, ModeError::GeometryRejected(_)));
        assert_eq!(handler.construction(), Construction::PendingStart(p));
        assert!(session.board.is_empty());
        assert!(session.open_transaction().is_none());
    }

    #[test]
    fn drag_starts_and_commits_in_one_gesture() {
        let mut session = EditorSession::default();
        let mut handler = RectangleHandler::new();
        let from = Point::new(mm(1), mm(1));
        let to = Point::new(mm(3), mm(4));
        handler.drag(&mut session, from, to, Modifiers::new()).unwrap();
        let polygon = session.board.objects().next().unwrap();
        match &polygon.shape {
            ObjectShape::Polygon(data) => assert_eq!(data.outline.len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
        assert_eq!(handler.construction(), Construction::PendingStart(to));
    }

    #[test]
    fn arc_creates_quarter_arc() {
        let mut session = EditorSession::default();
        let mut handler = ArcHandler::new();
        handler
            .click(&mut session, Point::new(mm(1), mm(5)), Modifiers::new())
            .unwrap();
        handler
            .click(&mut session, Point::new(mm(5), mm(1)), Modifiers::new())
            .unwrap();
        assert_eq!(session.board.count_kind(ObjectKind::Arc), 1);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut handler = LineHandler::new();
        let mut session = EditorSession::default();
        handler
            .click(&mut session, Point::new(0, 0), Modifiers::new())
            .unwrap();
        assert!(handler.cancel());
        assert!(!handler.cancel());
        assert_eq!(handler.construction(), Construction::Idle);
    }
}
