//! Spatial target resolution.
//!
//! Maps a cursor position or a selector keyword to concrete object
//! references. Resolution never mutates the session.

use super::error::ActionError;
use super::selector::TargetSelector;
use crate::board::{BoardObjectRef, Container, KindMask, ObjectKind, Point};
use crate::session::EditorSession;

/// Topmost eligible object under `at`, with its ownership chain.
///
/// A pad hit when pads are not eligible but elements are resolves to the
/// owning element.
pub fn resolve_at_cursor(
    session: &EditorSession,
    at: Point,
    eligible: KindMask,
) -> Option<BoardObjectRef> {
    for hit in session.board.hits_at(at, session.hit_slop) {
        if eligible.accepts(hit.kind()) {
            return Some(BoardObjectRef::of(Container::Board, hit));
        }
        if hit.kind() == ObjectKind::Pad
            && eligible.accepts(ObjectKind::Element)
            && let Some(owner) = hit.owner.and_then(|id| session.board.get(id))
        {
            return Some(BoardObjectRef::of(Container::Board, owner));
        }
    }
    None
}

/// Selected objects matching `eligible`, in creation order.
pub fn resolve_selected(session: &EditorSession, eligible: KindMask) -> Vec<BoardObjectRef> {
    refs(session, Container::Board, session.board.selected(eligible))
}

/// Resolves a selector to the objects an action should touch.
///
/// "Nothing found" is an empty result; an [`TargetSelector::Unknown`]
/// keyword is always an error.
pub fn resolve_selector(
    session: &EditorSession,
    selector: &TargetSelector,
    cursor: Point,
    eligible: KindMask,
) -> Result<Vec<BoardObjectRef>, ActionError> {
    let found = match selector {
        TargetSelector::ObjectAtCursor => resolve_at_cursor(session, cursor, eligible)
            .into_iter()
            .collect(),
        TargetSelector::AllSelected => resolve_selected(session, eligible),
        TargetSelector::SelectedOfKind(kind) => {
            resolve_selected(session, eligible & KindMask::from(*kind))
        }
        TargetSelector::MarkedPoint => session
            .mark
            .and_then(|mark| resolve_at_cursor(session, mark, eligible))
            .into_iter()
            .collect(),
        TargetSelector::PasteBufferContents => {
            let buffer = session.buffer.contents();
            refs(session, Container::Buffer, buffer.all_of(eligible))
        }
        TargetSelector::AllObjects => refs(session, Container::Board, session.board.all_of(eligible)),
        TargetSelector::Unknown(keyword) => {
            return Err(ActionError::UnknownTarget(keyword.clone()));
        }
    };
    Ok(found)
}

fn refs(
    session: &EditorSession,
    container: Container,
    ids: Vec<crate::board::ObjectId>,
) -> Vec<BoardObjectRef> {
    ids.into_iter()
        .filter_map(|id| session.object(container, id))
        .map(|object| BoardObjectRef::of(container, object))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ElementData, FlagId, LayerId, ObjectShape, PadData, mutate};

    fn mm(v: i64) -> i64 {
        v * 1_000_000
    }

    fn select(session: &mut EditorSession, reference: BoardObjectRef) {
        let object = session.board.get(reference.id).cloned().unwrap();
        let updated = mutate::set_flag(&object, FlagId::Selected, true).unwrap();
        session.replace_object(Container::Board, updated);
    }

    fn session_with_element() -> (EditorSession, BoardObjectRef, BoardObjectRef) {
        let mut session = EditorSession::default();
        let element = session.insert_new(
            Container::Board,
            None,
            None,
            ObjectShape::Element(ElementData {
                origin: Point::new(mm(50), mm(50)),
                refdes: "U1".into(),
                pads: vec![],
            }),
        );
        let pad = session.insert_new(
            Container::Board,
            Some(LayerId(0)),
            Some(element.id),
            ObjectShape::Pad(PadData {
                p1: Point::new(mm(51), mm(50)),
                p2: Point::new(mm(52), mm(50)),
                thickness: mm(1),
                clearance: 0,
                number: "1".into(),
            }),
        );
        (session, element, pad)
    }

    #[test]
    fn topmost_hit_wins_by_kind_priority() {
        let mut session = EditorSession::default();
        let line = session
            .create_line(Point::new(mm(10), mm(10)), Point::new(mm(30), mm(10)))
            .unwrap();
        let via = session.create_via(Point::new(mm(20), mm(10))).unwrap();
        let at = Point::new(mm(20), mm(10));
        assert_eq!(resolve_at_cursor(&session, at, KindMask::ALL).map(|r| r.id), Some(via.id));
        assert_eq!(
            resolve_at_cursor(&session, at, KindMask::LINE).map(|r| r.id),
            Some(line.id)
        );
        assert_eq!(resolve_at_cursor(&session, Point::new(0, 0), KindMask::ALL), None);
    }

    #[test]
    fn pad_resolves_to_element_when_only_elements_are_eligible() {
        let (session, element, pad) = session_with_element();
        let at = Point::new(mm(51), mm(50));
        let hit = resolve_at_cursor(&session, at, KindMask::ELEMENT).unwrap();
        assert_eq!(hit.id, element.id);
        let hit = resolve_at_cursor(&session, at, KindMask::ALL).unwrap();
        assert_eq!(hit.id, pad.id);
        assert_eq!(hit.chain().collect::<Vec<_>>(), vec![pad.id, element.id]);
    }

    #[test]
    fn selected_of_kind_filters() {
        let mut session = EditorSession::default();
        let line = session
            .create_line(Point::new(mm(10), mm(10)), Point::new(mm(30), mm(10)))
            .unwrap();
        let via = session.create_via(Point::new(mm(60), mm(60))).unwrap();
        select(&mut session, line);
        select(&mut session, via);

        let all = resolve_selector(
            &session,
            &TargetSelector::AllSelected,
            Point::new(0, 0),
            KindMask::ALL,
        )
        .unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![line.id, via.id]);

        let vias = resolve_selector(
            &session,
            &TargetSelector::SelectedOfKind(ObjectKind::Via),
            Point::new(0, 0),
            KindMask::ALL,
        )
        .unwrap();
        assert_eq!(vias.len(), 1);
        assert_eq!(vias[0].id, via.id);
    }

    #[test]
    fn mark_without_point_is_empty() {
        let (session, _, _) = session_with_element();
        let found = resolve_selector(
            &session,
            &TargetSelector::MarkedPoint,
            Point::new(0, 0),
            KindMask::ALL,
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn unknown_is_an_error_not_empty() {
        let session = EditorSession::default();
        let err = resolve_selector(
            &session,
            &TargetSelector::Unknown("Bogus".into()),
            Point::new(0, 0),
            KindMask::ALL,
        )
        .unwrap_err();
        assert_eq!(err, ActionError::UnknownTarget("Bogus".into()));
    }
}
