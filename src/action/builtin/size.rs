//! ChangeSize, ChangeDrillSize and ChangeClearSize.

use super::{apply_batch, required, resolve_targets};
use crate::action::context::{ActionContext, ActionOutcome};
use crate::action::error::ActionError;
use crate::action::value::ValueSpec;
use crate::board::{BoardObject, Coord, GeometryRejected, KindMask, mutate};
use crate::session::SizeAttribute;

const SYNTAX: &str = "(selector, value[, unit])";

pub(super) fn change_size(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    change_attribute(ctx, args, SizeAttribute::Size, KindMask::SIZED)
}

pub(super) fn change_drill_size(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    change_attribute(ctx, args, SizeAttribute::Drill, KindMask::VIA)
}

pub(super) fn change_clear_size(
    ctx: &mut ActionContext<'_>,
    args: &[String],
) -> Result<ActionOutcome, ActionError> {
    change_attribute(ctx, args, SizeAttribute::Clearance, KindMask::CLEARED)
}

fn current_value(object: &BoardObject, attribute: SizeAttribute) -> Option<Coord> {
    match attribute {
        SizeAttribute::Size => object.shape.size(),
        SizeAttribute::Clearance => object.shape.clearance(),
        SizeAttribute::Drill => object.shape.drill(),
    }
}

fn set_value(
    object: &BoardObject,
    attribute: SizeAttribute,
    value: Coord,
) -> Result<BoardObject, GeometryRejected> {
    match attribute {
        SizeAttribute::Size => mutate::set_size(object, value),
        SizeAttribute::Clearance => mutate::set_clearance(object, value),
        SizeAttribute::Drill => mutate::set_drill(object, value),
    }
}

fn change_attribute(
    ctx: &mut ActionContext<'_>,
    args: &[String],
    attribute: SizeAttribute,
    eligible: KindMask,
) -> Result<ActionOutcome, ActionError> {
    let keyword = required(ctx, args, 0, SYNTAX)?;
    let token = required(ctx, args, 1, SYNTAX)?;
    let unit = args.get(2).map(String::as_str);

    let targets = resolve_targets(ctx, keyword, eligible)?;
    let invalid = |reason| ActionError::InvalidValue {
        token: token.to_string(),
        reason,
    };
    let value = ValueSpec::parse(token, unit, ctx.session.units())
        .and_then(|spec| spec.resolve(ctx.session.units()))
        .map_err(invalid)?;
    let range = ctx.session.limits.range(attribute);

    apply_batch(ctx, targets, true, |object| {
        let Some(current) = current_value(object, attribute) else {
            return Ok(None);
        };
        let next = value.apply(current, range);
        if next == current {
            return Ok(None);
        }
        set_value(object, attribute, next).map(Some)
    })
}
