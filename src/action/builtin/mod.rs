//! Built-in action families.
//!
//! Every handler follows the same order: parse arguments, resolve targets,
//! parse values, then open one undo transaction and apply per target. Any
//! failure before the transaction leaves the session untouched.

mod edit;
mod flags;
mod mode;
mod size;

use super::context::{ActionContext, ActionOutcome};
use super::error::ActionError;
use super::registry::Action;
use super::resolver::resolve_selector;
use super::selector::TargetSelector;
use crate::board::{BoardObject, BoardObjectRef, GeometryRejected, KindMask};
use log::{info, warn};

/// Every built-in action, in help order.
pub static ACTIONS: &[Action] = &[
    Action {
        name: "ChangeSize",
        syntax: "(selector, value[, unit])",
        help: "Set or adjust line/arc thickness, via diameter, pad thickness or text height",
        handler: size::change_size,
    },
    Action {
        name: "ChangeDrillSize",
        syntax: "(selector, value[, unit])",
        help: "Set or adjust via drill diameter",
        handler: size::change_drill_size,
    },
    Action {
        name: "ChangeClearSize",
        syntax: "(selector, value[, unit])",
        help: "Set or adjust clearance of lines, arcs, vias and pads",
        handler: size::change_clear_size,
    },
    Action {
        name: "SetFlag",
        syntax: "(selector, flag)",
        help: "Set a flag (square, octagon, thermal, lock, clearline, found)",
        handler: flags::set_flag,
    },
    Action {
        name: "ClrFlag",
        syntax: "(selector, flag)",
        help: "Clear a flag",
        handler: flags::clear_flag,
    },
    Action {
        name: "ChangeFlag",
        syntax: "(selector, flag, 0|1)",
        help: "Set a flag to an explicit value",
        handler: flags::change_flag,
    },
    Action {
        name: "ToggleFlag",
        syntax: "(selector, flag)",
        help: "Invert a flag on each target",
        handler: flags::toggle_flag,
    },
    Action {
        name: "Select",
        syntax: "([selector])",
        help: "Add objects to the selection (default: object under cursor)",
        handler: flags::select,
    },
    Action {
        name: "Unselect",
        syntax: "([selector])",
        help: "Remove objects from the selection (default: object under cursor)",
        handler: flags::unselect,
    },
    Action {
        name: "Delete",
        syntax: "([selector])",
        help: "Remove objects (default: object under cursor)",
        handler: edit::delete,
    },
    Action {
        name: "PasteBuffer",
        syntax: "(AddSelected|Clear|ToLayout[, x, y])",
        help: "Copy the selection to the buffer, clear it, or paste it at the cursor",
        handler: edit::paste_buffer,
    },
    Action {
        name: "MarkCrosshair",
        syntax: "()",
        help: "Set or clear the mark at the cursor",
        handler: edit::mark_crosshair,
    },
    Action {
        name: "Undo",
        syntax: "()",
        help: "Undo the last operation",
        handler: edit::undo,
    },
    Action {
        name: "Redo",
        syntax: "()",
        help: "Redo the last undone operation",
        handler: edit::redo,
    },
    Action {
        name: "SetLayer",
        syntax: "(name)",
        help: "Choose the layer new geometry is placed on",
        handler: edit::set_layer,
    },
    Action {
        name: "Mode",
        syntax: "(name|Cancel|Close|Escape)",
        help: "Switch editing mode, or cancel/close the current construction",
        handler: mode::mode,
    },
    Action {
        name: "Polygon",
        syntax: "(Close|PreviousPoint)",
        help: "Close the polygon under construction or drop its last vertex",
        handler: mode::polygon,
    },
];

/// Required positional argument.
pub(super) fn required<'a>(
    ctx: &ActionContext<'_>,
    args: &'a [String],
    index: usize,
    syntax: &str,
) -> Result<&'a str, ActionError> {
    args.get(index)
        .map(String::as_str)
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ActionError::Usage(format!("{}{}", ctx.action, syntax)))
}

/// Parses the selector argument and resolves it against the session.
pub(super) fn resolve_targets(
    ctx: &ActionContext<'_>,
    keyword: &str,
    eligible: KindMask,
) -> Result<Vec<BoardObjectRef>, ActionError> {
    let selector = TargetSelector::parse(keyword);
    resolve_selector(&*ctx.session, &selector, ctx.cursor, eligible)
}

/// Applies `apply` to each target inside one undo transaction.
///
/// Locked targets are skipped unless `respect_lock` is false. `apply`
/// returns `Ok(None)` when the target needs no change. A rejection stops the
/// batch: targets already changed stay changed (in the same undo step) and
/// the error reports how many there were.
pub(super) fn apply_batch<F>(
    ctx: &mut ActionContext<'_>,
    targets: Vec<BoardObjectRef>,
    respect_lock: bool,
    mut apply: F,
) -> Result<ActionOutcome, ActionError>
where
    F: FnMut(&BoardObject) -> Result<Option<BoardObject>, GeometryRejected>,
{
    if targets.is_empty() {
        return Ok(ActionOutcome::nothing_found());
    }

    let mut mutated = 0;
    let mut locked = 0;
    let mut tx = ctx.session.begin_transaction()?;
    for target in targets {
        let Some(object) = tx.object(target.container, target.id).cloned() else {
            continue;
        };
        if respect_lock && object.is_locked() {
            locked += 1;
            continue;
        }
        match apply(&object) {
            Ok(Some(updated)) => {
                if tx.replace_object(target.container, updated) {
                    mutated += 1;
                }
            }
            Ok(None) => {}
            Err(source) => {
                warn!(
                    "{}: {} rejected after {} change(s): {}",
                    ctx.action, target, mutated, source
                );
                return Err(ActionError::GeometryRejected {
                    applied: mutated,
                    source,
                });
            }
        }
    }

    let outcome = ActionOutcome::applied(mutated);
    if locked > 0 {
        info!("{}: skipped {} locked object(s)", ctx.action, locked);
        return Ok(outcome.with_message(format!("skipped {locked} locked object(s)")));
    }
    Ok(outcome)
}
