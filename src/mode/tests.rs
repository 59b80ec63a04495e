use super::*;
use crate::board::{ObjectKind, ObjectShape, Point};
use crate::session::EditorSession;

fn create_test_machine(mode: EditorMode) -> (ModeMachine, EditorSession) {
    (
        ModeMachine::new(mode, ModeSettings::default()),
        EditorSession::default(),
    )
}

fn press_release(machine: &mut ModeMachine, session: &mut EditorSession, x: i64, y: i64) -> ModeResult {
    let at = Point::new(x, y);
    machine.handle(
        session,
        ModeEvent::Press {
            at,
            button: MouseButton::Left,
        },
        Modifiers::new(),
    )?;
    machine.handle(
        session,
        ModeEvent::Release {
            at,
            button: MouseButton::Left,
        },
        Modifiers::new(),
    )
}

const MM: i64 = 1_000_000;

#[test]
fn line_mode_two_clicks_make_one_segment() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Line);
    press_release(&mut machine, &mut session, 0, 0).unwrap();
    press_release(&mut machine, &mut session, 100, 100).unwrap();

    let lines: Vec<_> = session.board.objects().collect();
    assert_eq!(lines.len(), 1);
    match &lines[0].shape {
        ObjectShape::Line(line) => {
            assert_eq!(line.p1, Point::new(0, 0));
            assert_eq!(line.p2, Point::new(100, 100));
        }
        other => panic!("expected line, got {other:?}"),
    }
    assert_eq!(
        machine.construction(),
        Construction::PendingStart(Point::new(100, 100))
    );
}

#[test]
fn line_mode_cancel_produces_nothing() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Line);
    press_release(&mut machine, &mut session, 0, 0).unwrap();
    assert_eq!(
        machine.handle(&mut session, ModeEvent::Cancel, Modifiers::new()),
        Ok(ModeOutcome::Updated)
    );
    assert!(session.board.is_empty());
    assert_eq!(machine.construction(), Construction::Idle);
}

#[test]
fn escape_and_right_click_cancel() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Polygon);
    press_release(&mut machine, &mut session, MM, MM).unwrap();
    machine
        .handle(&mut session, ModeEvent::Key(Key::Escape), Modifiers::new())
        .unwrap();
    assert!(machine.construction().is_idle());

    press_release(&mut machine, &mut session, MM, MM).unwrap();
    machine
        .handle(
            &mut session,
            ModeEvent::Press {
                at: Point::new(0, 0),
                button: MouseButton::Right,
            },
            Modifiers::new(),
        )
        .unwrap();
    assert!(machine.construction().is_idle());
}

#[test]
fn polygon_close_requires_three_vertices() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Polygon);
    press_release(&mut machine, &mut session, MM, MM).unwrap();
    press_release(&mut machine, &mut session, 5 * MM, MM).unwrap();
    assert_eq!(
        machine.handle(&mut session, ModeEvent::Close, Modifiers::new()),
        Err(ModeError::TooFewVertices { have: 2, need: 3 })
    );
    assert_eq!(
        machine.construction(),
        Construction::Vertices(vec![Point::new(MM, MM), Point::new(5 * MM, MM)])
    );

    press_release(&mut machine, &mut session, 5 * MM, 5 * MM).unwrap();
    machine
        .handle(&mut session, ModeEvent::Close, Modifiers::new())
        .unwrap();
    assert_eq!(session.board.count_kind(ObjectKind::Polygon), 1);
    assert!(machine.construction().is_idle());
}

#[test]
fn mode_switch_discards_construction() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Line);
    press_release(&mut machine, &mut session, 0, 0).unwrap();
    assert!(machine.set_mode(&mut session, EditorMode::Polygon));
    assert!(machine.construction().is_idle());
    press_release(&mut machine, &mut session, MM, MM).unwrap();

    assert!(machine.set_mode(&mut session, EditorMode::Line));
    assert_eq!(machine.construction(), Construction::Idle);
    assert!(machine.set_mode(&mut session, EditorMode::Polygon));
    assert_eq!(machine.construction(), Construction::Idle);
    assert!(session.board.is_empty());
}

#[test]
fn reselecting_active_mode_keeps_construction() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Line);
    press_release(&mut machine, &mut session, 0, 0).unwrap();
    assert!(!machine.set_mode(&mut session, EditorMode::Line));
    assert_eq!(
        machine.construction(),
        Construction::PendingStart(Point::new(0, 0))
    );
}

#[test]
fn grid_snaps_pointer_coordinates() {
    let settings = ModeSettings {
        grid: 1000,
        ..ModeSettings::default()
    };
    let mut machine = ModeMachine::new(EditorMode::Line, settings);
    let mut session = EditorSession::default();
    press_release(&mut machine, &mut session, 1_240, 2_510).unwrap();
    assert_eq!(
        machine.construction(),
        Construction::PendingStart(Point::new(1_000, 3_000))
    );
    assert_eq!(session.cursor, Point::new(1_000, 3_000));
}

#[test]
fn small_movement_is_still_a_click() {
    let settings = ModeSettings {
        drag_threshold: 50,
        ..ModeSettings::default()
    };
    let mut machine = ModeMachine::new(EditorMode::Via, settings);
    let mut session = EditorSession::default();
    machine
        .on_press(&mut session, MouseButton::Left, Point::new(MM, MM))
        .unwrap();
    machine
        .on_release(
            &mut session,
            MouseButton::Left,
            Point::new(MM + 30, MM),
            Modifiers::new(),
        )
        .unwrap();
    let via = session.board.objects().next().unwrap();
    match &via.shape {
        ObjectShape::Via(data) => assert_eq!(data.center, Point::new(MM, MM)),
        other => panic!("expected via, got {other:?}"),
    }
}

#[test]
fn arrow_drag_shows_box_until_release() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Arrow);
    session.create_via(Point::new(10 * MM, 10 * MM)).unwrap();
    machine
        .on_press(&mut session, MouseButton::Left, Point::new(5 * MM, 5 * MM))
        .unwrap();
    machine
        .on_motion(&mut session, Point::new(15 * MM, 15 * MM))
        .unwrap();
    assert_eq!(
        machine.construction(),
        Construction::BoxSelect {
            from: Point::new(5 * MM, 5 * MM),
            to: Point::new(15 * MM, 15 * MM)
        }
    );
    machine
        .on_release(
            &mut session,
            MouseButton::Left,
            Point::new(15 * MM, 15 * MM),
            Modifiers::new(),
        )
        .unwrap();
    assert!(machine.construction().is_idle());
    assert_eq!(
        session
            .board
            .selected(crate::board::KindMask::ALL)
            .len(),
        1
    );
}

#[test]
fn rejected_geometry_is_reported_and_chain_continues() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Line);
    press_release(&mut machine, &mut session, MM, MM).unwrap();
    let err = press_release(&mut machine, &mut session, 500 * MM, MM).unwrap_err();
    assert!(matches!(err, ModeError::GeometryRejected(_)));
    assert_eq!(
        machine.construction(),
        Construction::PendingStart(Point::new(500 * MM, MM))
    );
    assert!(session.open_transaction().is_none());
}

#[test]
fn text_mode_keys_go_to_entry() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Text);
    press_release(&mut machine, &mut session, MM, MM).unwrap();
    assert!(machine.is_typing());
    for c in "GND".chars() {
        machine.on_key(&mut session, Key::Char(c)).unwrap();
    }
    machine.on_key(&mut session, Key::Return).unwrap();
    assert_eq!(session.board.count_kind(ObjectKind::Text), 1);
    assert!(!machine.is_typing());
}

#[test]
fn every_mode_starts_idle() {
    for mode in EditorMode::ALL {
        let machine = ModeMachine::new(mode, ModeSettings::default());
        assert_eq!(machine.mode(), mode);
        assert!(machine.construction().is_idle(), "{mode} not idle");
    }
}

#[test]
fn commits_mark_the_board_dirty() {
    let (mut machine, mut session) = create_test_machine(EditorMode::Via);
    assert!(!session.dirty().is_dirty());
    press_release(&mut machine, &mut session, MM, MM).unwrap();
    assert!(session.dirty().is_dirty());
}
