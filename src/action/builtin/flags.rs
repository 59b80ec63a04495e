//! Flag actions: SetFlag, ClrFlag, ChangeFlag, ToggleFlag, Select, Unselect.

use super::{apply_batch, required, resolve_targets};
use crate::action::context::{ActionContext, ActionOutcome};
use crate::action::error::ActionError;
use crate::board::{FlagId, KindMask, mutate};

#[derive(Debug, Clone, Copy)]
enum FlagChange {
    Set(bool),
    Toggle,
}

fn parse_flag(ctx: &ActionContext<'_>, keyword: &str) -> Result<FlagId, ActionError> {
    FlagId::from_keyword(keyword).ok_or_else(|| {
        let known: Vec<&str> = FlagId::ALL.iter().map(|f| f.keyword()).collect();
        ActionError::invalid_argument(ctx.action, keyword, format!("one of {}", known.join(", ")))
    })
}

fn change(
    ctx: &mut ActionContext<'_>,
    keyword: &str,
    flag: FlagId,
    how: FlagChange,
) -> Result<ActionOutcome, ActionError> {
    let targets = resolve_targets(ctx, keyword, flag.applicable_kinds())?;
    apply_batch(ctx, targets, !flag.bypasses_lock(), |object| {
        let on = match how {
            FlagChange::Set(on) => on,
            FlagChange::Toggle => !object.has_flag(flag),
        };
        Ok(mutate::set_flag(object, flag, on))
    })
}

fn flag_action(
    ctx: &mut ActionContext<'_>,
    args: &[String],
    how: FlagChange,
) -> Result<ActionOutcome, ActionError> {
    const SYNTAX: &str = "(selector, flag)";
    let keyword = required(ctx, args, 0, SYNTAX)?;
    let flag = parse_flag(ctx, required(ctx, args, 1, SYNTAX)?)?;
    change(ctx, keyword, flag, how)
}

pub(super) fn set_flag(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    flag_action(ctx, args, FlagChange::Set(true))
}

pub(super) fn clear_flag(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    flag_action(ctx, args, FlagChange::Set(false))
}

pub(super) fn toggle_flag(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    flag_action(ctx, args, FlagChange::Toggle)
}

pub(super) fn change_flag(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    const SYNTAX: &str = "(selector, flag, 0|1)";
    let keyword = required(ctx, args, 0, SYNTAX)?;
    let flag = parse_flag(ctx, required(ctx, args, 1, SYNTAX)?)?;
    let raw = required(ctx, args, 2, SYNTAX)?;
    let on = match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "on" | "true" => true,
        "0" | "off" | "false" => false,
        _ => return Err(ActionError::invalid_argument(ctx.action, raw, "0 or 1")),
    };
    change(ctx, keyword, flag, FlagChange::Set(on))
}

fn selection(
    ctx: &mut ActionContext<'_>,
    args: &[String],
    on: bool,
) -> Result<ActionOutcome, ActionError> {
    let keyword = args
        .first()
        .map(String::as_str)
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Object");
    let targets = resolve_targets(ctx, keyword, KindMask::ALL)?;
    apply_batch(ctx, targets, false, |object| {
        Ok(mutate::set_flag(object, FlagId::Selected, on))
    })
}

pub(super) fn select(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    selection(ctx, args, true)
}

pub(super) fn unselect(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    selection(ctx, args, false)
}

#[cfg(test)]
mod tests {
    use crate::action::{ActionError, ActionOutcome, ActionRegistry, ActionStatus};
    use crate::board::{FlagId, KindMask, Point};
    use crate::mode::ModeMachine;
    use crate::session::EditorSession;

    const MM: i64 = 1_000_000;

    fn run_at(
        session: &mut EditorSession,
        cursor: Point,
        name: &str,
        args: &[&str],
    ) -> Result<ActionOutcome, ActionError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        ActionRegistry::builtin().execute(session, &mut ModeMachine::default(), name, &args, cursor)
    }

    fn run(session: &mut EditorSession, name: &str, args: &[&str]) -> Result<ActionOutcome, ActionError> {
        run_at(session, Point::new(0, 0), name, args)
    }

    fn vias(n: i64) -> EditorSession {
        let mut session = EditorSession::default();
        for i in 0..n {
            session.create_via(Point::new((i + 1) * 10 * MM, 10 * MM)).unwrap();
        }
        session
    }

    #[test]
    fn select_all_then_set_flag() {
        let mut session = vias(3);
        run(&mut session, "Select", &["All"]).unwrap();
        assert_eq!(session.board.selected(KindMask::ALL).len(), 3);

        let outcome = run(&mut session, "SetFlag", &["Selected", "square"]).unwrap();
        assert_eq!(outcome.mutated, 3);
        assert!(session.board.objects().all(|o| o.has_flag(FlagId::Square)));

        let outcome = run(&mut session, "SetFlag", &["Selected", "square"]).unwrap();
        assert_eq!(outcome.mutated, 0);
        assert_eq!(outcome.status, ActionStatus::Applied);
    }

    #[test]
    fn toggle_inverts_per_target() {
        let mut session = vias(2);
        run_at(&mut session, Point::new(10 * MM, 10 * MM), "SetFlag", &["Object", "octagon"]).unwrap();
        run(&mut session, "Select", &["All"]).unwrap();
        run(&mut session, "ToggleFlag", &["Selected", "octagon"]).unwrap();
        let flags: Vec<bool> = session
            .board
            .objects()
            .map(|o| o.has_flag(FlagId::Octagon))
            .collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn change_flag_takes_explicit_value() {
        let mut session = vias(1);
        run(&mut session, "Select", &["All"]).unwrap();
        run(&mut session, "ChangeFlag", &["Selected", "thermal", "1"]).unwrap();
        assert!(session.board.objects().all(|o| o.has_flag(FlagId::Thermal)));
        run(&mut session, "ChangeFlag", &["Selected", "thermal", "0"]).unwrap();
        assert!(!session.board.objects().any(|o| o.has_flag(FlagId::Thermal)));
        let err = run(&mut session, "ChangeFlag", &["Selected", "thermal", "maybe"]).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArgument { .. }));
    }

    #[test]
    fn unknown_flag_is_rejected_before_resolution() {
        let mut session = vias(1);
        let err = run(&mut session, "SetFlag", &["Bogus", "sparkly"]).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArgument { .. }));
    }

    #[test]
    fn missing_arguments_report_usage() {
        let mut session = vias(1);
        let err = run(&mut session, "SetFlag", &["Selected"]).unwrap_err();
        assert_eq!(err, ActionError::Usage("SetFlag(selector, flag)".into()));
    }

    #[test]
    fn lock_blocks_other_flags_but_not_selection() {
        let mut session = vias(1);
        let at = Point::new(10 * MM, 10 * MM);
        run_at(&mut session, at, "SetFlag", &["Object", "lock"]).unwrap();
        let outcome = run_at(&mut session, at, "SetFlag", &["Object", "square"]).unwrap();
        assert_eq!(outcome.mutated, 0);
        let outcome = run_at(&mut session, at, "Select", &[]).unwrap();
        assert_eq!(outcome.mutated, 1);
    }

    #[test]
    fn unselect_all_clears_selection() {
        let mut session = vias(3);
        run(&mut session, "Select", &["All"]).unwrap();
        let outcome = run(&mut session, "Unselect", &["All"]).unwrap();
        assert_eq!(outcome.mutated, 3);
        assert!(session.board.selected(KindMask::ALL).is_empty());
        session.undo().unwrap();
        assert_eq!(session.board.selected(KindMask::ALL).len(), 3);
    }
}
