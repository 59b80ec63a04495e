//! Front-end facing editor: session, mode machine, action registry and keybindings.
//!
//! A front end (GUI, test harness or script runner) owns one [`Editor`] and
//! feeds it pointer events, key presses and command lines. The editor keeps
//! the modifier state, maps bound keys to action invocations and forwards
//! everything else to the active mode.

use crate::action::{ActionError, ActionOutcome, ActionRegistry, Invocation};
use crate::board::Point;
use crate::config::{Config, KeyBinding, KeyBindingError};
use crate::mode::{EditorMode, Key, ModeMachine, ModeOutcome, ModeResult, Modifiers, MouseButton};
use crate::session::EditorSession;
use log::{debug, info};
use std::collections::HashMap;

/// What a key press ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Modifier state changed
    Modifier,
    /// A bound command ran
    Command(Vec<ActionOutcome>),
    /// The key went to the active mode
    Mode(ModeOutcome),
}

/// Everything one editing front end needs.
#[derive(Debug)]
pub struct Editor {
    pub session: EditorSession,
    pub modes: ModeMachine,
    registry: ActionRegistry,
    /// Keybinding → action invocation string
    action_map: HashMap<KeyBinding, String>,
    modifiers: Modifiers,
}

impl Editor {
    /// Creates an editor over an existing session and mode machine.
    pub fn new(
        session: EditorSession,
        modes: ModeMachine,
        action_map: HashMap<KeyBinding, String>,
    ) -> Self {
        Self {
            session,
            modes,
            registry: ActionRegistry::with_builtins(),
            action_map,
            modifiers: Modifiers::new(),
        }
    }

    /// Builds a fresh editor from validated configuration.
    ///
    /// # Errors
    /// Returns an error if the keybinding table is invalid.
    pub fn from_config(config: &Config) -> Result<Self, KeyBindingError> {
        let action_map = config.keybindings.build_action_map()?;
        let modes = ModeMachine::new(config.initial_mode(), config.mode_settings());
        info!(
            "Editor ready: {} action(s), {} keybinding(s), mode {}",
            ActionRegistry::builtin().len(),
            action_map.len(),
            modes.mode()
        );
        Ok(Self::new(config.build_session(), modes, action_map))
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Registry for adding front-end specific actions.
    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn mode(&self) -> EditorMode {
        self.modes.mode()
    }

    /// Moves the cursor without generating a pointer event.
    pub fn set_cursor(&mut self, at: Point) {
        self.session.cursor = at;
    }

    /// Runs one action at the current cursor.
    pub fn execute(&mut self, name: &str, args: &[String]) -> Result<ActionOutcome, ActionError> {
        let cursor = self.session.cursor;
        self.registry
            .execute(&mut self.session, &mut self.modes, name, args, cursor)
    }

    /// Parses and runs a command line such as `Select(All); Delete(Selected)`.
    ///
    /// Invocations run in order; the first failure stops the line. Edits
    /// made by earlier invocations stay applied.
    pub fn run_command(&mut self, line: &str) -> Result<Vec<ActionOutcome>, ActionError> {
        let invocations = Invocation::parse_line(line)?;
        let mut outcomes = Vec::with_capacity(invocations.len());
        for invocation in &invocations {
            outcomes.push(self.execute(&invocation.name, &invocation.args)?);
        }
        Ok(outcomes)
    }

    /// Look up a bound command for the given key and the held modifiers.
    fn find_command(&self, key_str: &str) -> Option<String> {
        self.action_map
            .iter()
            .find(|(binding, _)| {
                binding.matches(
                    key_str,
                    self.modifiers.ctrl,
                    self.modifiers.shift,
                    self.modifiers.alt,
                )
            })
            .map(|(_, command)| command.clone())
    }

    /// Processes a key press.
    ///
    /// # Behavior
    /// - Modifier keys update the modifier state
    /// - While a text entry is open, plain keys are typed into it; only
    ///   Escape and Ctrl/Alt combinations are looked up as bindings
    /// - Otherwise a bound key runs its command and any other key goes to
    ///   the active mode
    pub fn on_key_press(&mut self, key: Key) -> Result<KeyOutcome, ActionError> {
        if self.modifiers.update(key, true) {
            return Ok(KeyOutcome::Modifier);
        }

        let check_bindings = !self.modes.is_typing()
            || key == Key::Escape
            || self.modifiers.ctrl
            || self.modifiers.alt;

        if check_bindings
            && let Some(command) = key.binding_name().and_then(|name| self.find_command(&name))
        {
            debug!("Key {:?} bound to {}", key, command);
            return self.run_command(&command).map(KeyOutcome::Command);
        }

        Ok(KeyOutcome::Mode(self.modes.on_key(&mut self.session, key)?))
    }

    /// Processes a key release. Only modifier state is affected.
    pub fn on_key_release(&mut self, key: Key) {
        self.modifiers.update(key, false);
    }

    /// Types `text` into the active mode, bypassing keybindings.
    pub fn type_text(&mut self, text: &str) -> ModeResult {
        let mut last = ModeOutcome::Ignored;
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            last = self.modes.on_key(&mut self.session, key)?;
        }
        Ok(last)
    }

    pub fn on_pointer_press(&mut self, at: Point, button: MouseButton) -> ModeResult {
        self.modes.on_press(&mut self.session, button, at)
    }

    pub fn on_pointer_motion(&mut self, at: Point) -> ModeResult {
        self.modes.on_motion(&mut self.session, at)
    }

    pub fn on_pointer_release(&mut self, at: Point, button: MouseButton) -> ModeResult {
        self.modes
            .on_release(&mut self.session, button, at, self.modifiers)
    }

    /// Press and release at the same point with the held modifiers.
    pub fn click(&mut self, at: Point) -> ModeResult {
        self.modes.click(&mut self.session, at, self.modifiers)
    }

    pub fn cancel(&mut self) -> ModeResult {
        self.modes.cancel(&mut self.session)
    }

    pub fn close(&mut self) -> ModeResult {
        self.modes.close(&mut self.session)
    }

    /// Switches mode. Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: EditorMode) -> bool {
        self.modes.set_mode(&mut self.session, mode)
    }
}
