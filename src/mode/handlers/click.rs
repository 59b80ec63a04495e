//! Single-click modes: Via, Lock and Thermal.
//!
//! A click commits one operation immediately. None of these modes keeps any
//! construction state between clicks.

use super::{ModeHandler, ModeResult, commit, set_object_flag};
use crate::action::resolver::resolve_at_cursor;
use crate::board::{FlagId, KindMask, Point};
use crate::mode::{Construction, EditorMode, ModeOutcome, Modifiers};
use crate::session::EditorSession;
use log::{debug, info};

/// Via mode: places a via at each click.
#[derive(Debug, Default)]
pub struct ViaHandler;

impl ViaHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ModeHandler for ViaHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Via
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        commit(session, |s| s.create_via(at).map(|r| vec![r]))
    }

    fn cancel(&mut self) -> bool {
        false
    }

    fn construction(&self) -> Construction {
        Construction::Idle
    }
}

/// Toggles `flag` on the topmost eligible object under `at`.
fn toggle_flag_at(
    session: &mut EditorSession,
    at: Point,
    flag: FlagId,
    eligible: KindMask,
) -> ModeResult {
    let Some(target) = resolve_at_cursor(session, at, eligible) else {
        debug!("No object for {} toggle at {:?}", flag, at);
        return Ok(ModeOutcome::NoObjectFound);
    };
    let Some(object) = session.object(target.container, target.id) else {
        return Ok(ModeOutcome::NoObjectFound);
    };
    if object.is_locked() && !flag.bypasses_lock() {
        info!("{} is locked; {} unchanged", target, flag);
        return Ok(ModeOutcome::Ignored);
    }
    let on = !object.has_flag(flag);

    let mut tx = session.begin_transaction()?;
    Ok(match set_object_flag(&mut tx, target, flag, on) {
        Some(changed) => ModeOutcome::Committed(vec![changed]),
        None => ModeOutcome::Ignored,
    })
}

/// Lock mode: toggles the lock flag of the clicked object.
#[derive(Debug, Default)]
pub struct LockHandler;

impl LockHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ModeHandler for LockHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Lock
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        toggle_flag_at(session, at, FlagId::Lock, FlagId::Lock.applicable_kinds())
    }

    fn cancel(&mut self) -> bool {
        false
    }

    fn construction(&self) -> Construction {
        Construction::Idle
    }
}

/// Thermal mode: toggles the thermal flag of the clicked via or pad.
#[derive(Debug, Default)]
pub struct ThermalHandler;

impl ThermalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ModeHandler for ThermalHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Thermal
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        toggle_flag_at(session, at, FlagId::Thermal, FlagId::Thermal.applicable_kinds())
    }

    fn cancel(&mut self) -> bool {
        false
    }

    fn construction(&self) -> Construction {
        Construction::Idle
    }
}
