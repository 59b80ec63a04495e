//! Mode switching and construction control.

use super::required;
use crate::action::context::{ActionContext, ActionOutcome};
use crate::action::error::ActionError;
use crate::mode::{EditorMode, ModeOutcome};

fn outcome(result: ModeOutcome) -> ActionOutcome {
    match result {
        ModeOutcome::Committed(created) => ActionOutcome::applied(created.len()),
        ModeOutcome::NoObjectFound => ActionOutcome::nothing_found(),
        ModeOutcome::Ignored | ModeOutcome::Updated => ActionOutcome::applied(0),
    }
}

/// `Mode(name|Cancel|Escape|Close)`
pub(super) fn mode(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    let arg = required(ctx, args, 0, "(name|Cancel|Close)")?.trim();
    match arg.to_ascii_lowercase().as_str() {
        "cancel" | "escape" => Ok(outcome(ctx.modes.cancel(ctx.session)?)),
        "close" => Ok(outcome(ctx.modes.close(ctx.session)?)),
        _ => {
            let Some(mode) = EditorMode::from_keyword(arg) else {
                let names: Vec<&str> = EditorMode::ALL.iter().map(|m| m.keyword()).collect();
                return Err(ActionError::invalid_argument(
                    ctx.action,
                    arg,
                    format!("a mode ({}), Cancel or Close", names.join(", ")),
                ));
            };
            let changed = ctx.modes.set_mode(ctx.session, mode);
            let outcome = ActionOutcome::applied(0);
            Ok(if changed {
                outcome.with_message(format!("mode {mode}"))
            } else {
                outcome
            })
        }
    }
}

/// `Polygon(Close|PreviousPoint)`
pub(super) fn polygon(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    let arg = required(ctx, args, 0, "(Close|PreviousPoint)")?.trim();
    match arg.to_ascii_lowercase().as_str() {
        "close" => Ok(outcome(ctx.modes.close(ctx.session)?)),
        "previouspoint" => Ok(outcome(ctx.modes.previous_point(ctx.session)?)),
        _ => Err(ActionError::invalid_argument(
            ctx.action,
            arg,
            "Close or PreviousPoint",
        )),
    }
}
