//! Delete, paste buffer, mark, undo/redo and layer selection.

use super::{required, resolve_targets};
use crate::action::context::{ActionContext, ActionOutcome};
use crate::action::error::ActionError;
use crate::action::value::{ResolvedValue, ValueSpec};
use crate::board::{Coord, KindMask, Point};
use crate::units::{UnitId, format_coord};
use log::info;

pub(super) fn delete(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    let keyword = args
        .first()
        .map(String::as_str)
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Object");
    let targets = resolve_targets(ctx, keyword, KindMask::ALL)?;
    if targets.is_empty() {
        return Ok(ActionOutcome::nothing_found());
    }

    let mut removed = 0;
    let mut locked = 0;
    let mut tx = ctx.session.begin_transaction()?;
    for target in targets {
        match tx.object(target.container, target.id) {
            None => continue,
            Some(object) if object.is_locked() => {
                locked += 1;
                continue;
            }
            Some(_) => removed += tx.remove_object(target.container, target.id),
        }
    }
    drop(tx);

    let outcome = ActionOutcome::applied(removed);
    Ok(if locked > 0 {
        outcome.with_message(format!("skipped {locked} locked object(s)"))
    } else {
        outcome
    })
}

/// Parses an absolute coordinate argument such as `12.5mm`.
fn coordinate(ctx: &ActionContext<'_>, token: &str) -> Result<Coord, ActionError> {
    let resolved = ValueSpec::parse(token.trim_start_matches('='), None, ctx.session.units())
        .and_then(|spec| spec.resolve(ctx.session.units()))
        .map_err(|reason| ActionError::InvalidValue {
            token: token.to_string(),
            reason,
        })?;
    Ok(match resolved {
        ResolvedValue::Absolute(v) | ResolvedValue::Relative(v) => v,
    })
}

pub(super) fn paste_buffer(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    const SYNTAX: &str = "(AddSelected|Clear|ToLayout[, x, y])";
    let op = required(ctx, args, 0, SYNTAX)?;
    match op.trim().to_ascii_lowercase().as_str() {
        "addselected" => {
            if ctx.session.board.selected(KindMask::ALL).is_empty() {
                return Ok(ActionOutcome::nothing_found());
            }
            let mut tx = ctx.session.begin_transaction()?;
            let copied = tx.buffer_add_selected();
            Ok(ActionOutcome::applied(0).with_message(format!("{copied} object(s) copied to buffer")))
        }
        "clear" => {
            let mut tx = ctx.session.begin_transaction()?;
            let cleared = tx.buffer_clear();
            Ok(ActionOutcome::applied(0).with_message(format!("{cleared} object(s) cleared from buffer")))
        }
        "tolayout" => {
            let at = match (args.get(1), args.get(2)) {
                (Some(x), Some(y)) => Point::new(coordinate(ctx, x)?, coordinate(ctx, y)?),
                (None, None) => ctx.cursor,
                _ => return Err(ActionError::Usage(format!("{}{}", ctx.action, SYNTAX))),
            };
            if ctx.session.buffer.is_empty() {
                return Ok(ActionOutcome::nothing_found());
            }
            let placed = ctx
                .session
                .placed_buffer(at)
                .map_err(|source| ActionError::GeometryRejected { applied: 0, source })?;
            let mut tx = ctx.session.begin_transaction()?;
            let pasted = tx.insert_placed(placed);
            Ok(ActionOutcome::applied(pasted.len()))
        }
        _ => Err(ActionError::invalid_argument(
            ctx.action,
            op,
            "AddSelected, Clear or ToLayout",
        )),
    }
}

pub(super) fn mark_crosshair(
    ctx: &mut ActionContext<'_>,
    _args: &[String],
) -> Result<ActionOutcome, ActionError> {
    let message = match ctx.session.toggle_mark(ctx.cursor) {
        Some(mark) => format!(
            "mark set at ({}, {})",
            format_coord(mark.x, UnitId::Mm),
            format_coord(mark.y, UnitId::Mm)
        ),
        None => "mark cleared".to_string(),
    };
    info!("{}", message);
    Ok(ActionOutcome::applied(0).with_message(message))
}

pub(super) fn undo(
    ctx: &mut ActionContext<'_>,
    _args: &[String],
) -> Result<ActionOutcome, ActionError> {
    Ok(match ctx.session.undo()? {
        Some(step) => ActionOutcome::applied(step.entries),
        None => ActionOutcome::applied(0).with_message("nothing to undo"),
    })
}

pub(super) fn redo(
    ctx: &mut ActionContext<'_>,
    _args: &[String],
) -> Result<ActionOutcome, ActionError> {
    Ok(match ctx.session.redo()? {
        Some(step) => ActionOutcome::applied(step.entries),
        None => ActionOutcome::applied(0).with_message("nothing to redo"),
    })
}

pub(super) fn set_layer(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    let name = required(ctx, args, 0, "(name)")?;
    ctx.session.set_layer(name.trim())?;
    Ok(ActionOutcome::applied(0).with_message(format!("layer {}", name.trim())))
}
