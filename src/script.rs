//! Replay of editing scripts.
//!
//! A script is plain text, one step per line:
//!
//! ```text
//! # comments start with '#'
//! @mode line
//! @click 10mm 10mm
//! @click 20mm 10mm
//! Select(All); ChangeSize(Selected, =12mil)
//! ```
//!
//! Lines starting with `@` are gesture directives fed to the mode machine;
//! anything else is a command line for the action registry.

use crate::action::{ActionError, ActionOutcome, ResolvedValue, ValueError, ValueSpec};
use crate::board::{Coord, Point};
use crate::config::KeyBinding;
use crate::editor::{Editor, KeyOutcome};
use crate::mode::{EditorMode, Key, ModeError, ModeOutcome, MouseButton};
use crate::units::UnitConverter;
use log::{debug, info, warn};
use std::fmt;
use thiserror::Error;

/// A gesture directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Move the cursor without a pointer event
    Cursor(Point),
    Press(Point, MouseButton),
    Motion(Point),
    Release(Point, MouseButton),
    /// Press and release at one point
    Click(Point),
    Cancel,
    Close,
    /// Key combination such as `Escape` or `Ctrl+Z`
    Key(KeyBinding),
    /// Characters typed into the active mode
    Type(String),
    Mode(EditorMode),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Command(String),
    Directive(Directive),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown directive '@{0}'")]
    UnknownDirective(String),

    #[error("@{directive} expects {expected}")]
    MissingArgument {
        directive: String,
        expected: &'static str,
    },

    #[error("invalid coordinate '{token}': {source}")]
    InvalidCoordinate {
        token: String,
        #[source]
        source: ValueError,
    },

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("unknown mode '{0}'")]
    UnknownMode(String),

    #[error("unknown mouse button '{0}'")]
    UnknownButton(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Mode(#[from] ModeError),
}

/// A failed script line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct ScriptFailure {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    #[source]
    pub error: ScriptError,
}

/// Summary of a script run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// Lines that ran successfully
    pub succeeded: usize,
    /// Lines that failed (only more than one with keep-going)
    pub failures: Vec<ScriptFailure>,
}

impl ScriptReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line(s) succeeded, {} failed",
            self.succeeded,
            self.failures.len()
        )
    }
}

fn coordinate(token: &str, units: &dyn UnitConverter) -> Result<Coord, ScriptError> {
    let invalid = |source| ScriptError::InvalidCoordinate {
        token: token.to_string(),
        source,
    };
    let spec = ValueSpec::parse(token, None, units).map_err(invalid)?;
    match spec.resolve(units).map_err(invalid)? {
        ResolvedValue::Absolute(v) | ResolvedValue::Relative(v) => Ok(v),
    }
}

fn point(
    directive: &str,
    args: &[&str],
    units: &dyn UnitConverter,
) -> Result<Point, ScriptError> {
    match args {
        [x, y, ..] => Ok(Point::new(coordinate(x, units)?, coordinate(y, units)?)),
        _ => Err(ScriptError::MissingArgument {
            directive: directive.to_string(),
            expected: "x y",
        }),
    }
}

fn button(args: &[&str]) -> Result<MouseButton, ScriptError> {
    match args.get(2).map(|b| b.to_ascii_lowercase()) {
        None => Ok(MouseButton::Left),
        Some(b) => match b.as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(ScriptError::UnknownButton(b)),
        },
    }
}

/// Parses one line. Blank lines and comments yield `None`.
pub fn parse_line(
    line: &str,
    units: &dyn UnitConverter,
) -> Result<Option<ScriptStep>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let Some(directive) = line.strip_prefix('@') else {
        return Ok(Some(ScriptStep::Command(line.to_string())));
    };

    let (name, rest) = directive
        .split_once(char::is_whitespace)
        .map_or((directive, ""), |(n, r)| (n, r.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();
    let name_lower = name.to_ascii_lowercase();

    let directive = match name_lower.as_str() {
        "cursor" => Directive::Cursor(point(name, &args, units)?),
        "press" => Directive::Press(point(name, &args, units)?, button(&args)?),
        "motion" | "move" => Directive::Motion(point(name, &args, units)?),
        "release" => Directive::Release(point(name, &args, units)?, button(&args)?),
        "click" => Directive::Click(point(name, &args, units)?),
        "cancel" => Directive::Cancel,
        "close" => Directive::Close,
        "key" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument {
                    directive: name.to_string(),
                    expected: "a key name",
                });
            }
            let binding =
                KeyBinding::parse(rest).map_err(|_| ScriptError::UnknownKey(rest.to_string()))?;
            if Key::from_name(&binding.key) == Key::Unknown {
                return Err(ScriptError::UnknownKey(rest.to_string()));
            }
            Directive::Key(binding)
        }
        "type" => Directive::Type(rest.to_string()),
        "mode" => {
            let mode = EditorMode::from_keyword(rest)
                .ok_or_else(|| ScriptError::UnknownMode(rest.to_string()))?;
            Directive::Mode(mode)
        }
        _ => return Err(ScriptError::UnknownDirective(name.to_string())),
    };
    Ok(Some(ScriptStep::Directive(directive)))
}

fn press_key(editor: &mut Editor, binding: &KeyBinding) -> Result<KeyOutcome, ScriptError> {
    let modifiers: Vec<Key> = [
        (binding.ctrl, Key::Ctrl),
        (binding.shift, Key::Shift),
        (binding.alt, Key::Alt),
    ]
    .into_iter()
    .filter_map(|(held, key)| held.then_some(key))
    .collect();

    for key in &modifiers {
        editor.on_key_press(*key)?;
    }
    let result = editor.on_key_press(Key::from_name(&binding.key));
    for key in &modifiers {
        editor.on_key_release(*key);
    }
    Ok(result?)
}

fn log_mode(outcome: ModeOutcome) {
    match outcome {
        ModeOutcome::Committed(created) => info!("Committed {} object(s)", created.len()),
        ModeOutcome::NoObjectFound => info!("No object found"),
        ModeOutcome::Updated | ModeOutcome::Ignored => {}
    }
}

fn log_actions(outcomes: &[ActionOutcome]) {
    for outcome in outcomes {
        info!("{}", outcome);
    }
}

/// Runs one parsed step against the editor.
pub fn run_step(editor: &mut Editor, step: &ScriptStep) -> Result<(), ScriptError> {
    match step {
        ScriptStep::Command(line) => log_actions(&editor.run_command(line)?),
        ScriptStep::Directive(directive) => match directive {
            Directive::Cursor(at) => editor.set_cursor(*at),
            Directive::Press(at, button) => log_mode(editor.on_pointer_press(*at, *button)?),
            Directive::Motion(at) => log_mode(editor.on_pointer_motion(*at)?),
            Directive::Release(at, button) => log_mode(editor.on_pointer_release(*at, *button)?),
            Directive::Click(at) => log_mode(editor.click(*at)?),
            Directive::Cancel => log_mode(editor.cancel()?),
            Directive::Close => log_mode(editor.close()?),
            Directive::Key(binding) => match press_key(editor, binding)? {
                KeyOutcome::Command(outcomes) => log_actions(&outcomes),
                KeyOutcome::Mode(outcome) => log_mode(outcome),
                KeyOutcome::Modifier => {}
            },
            Directive::Type(text) => log_mode(editor.type_text(text)?),
            Directive::Mode(mode) => {
                editor.set_mode(*mode);
            }
        },
    }
    Ok(())
}

/// Runs every line of `script`.
///
/// Without `keep_going` the first failing line stops the run and is
/// returned as the error. With it, failures are collected in the report.
pub fn run_script(
    editor: &mut Editor,
    script: &str,
    keep_going: bool,
) -> Result<ScriptReport, ScriptFailure> {
    let mut report = ScriptReport::default();
    for (index, text) in script.lines().enumerate() {
        let line = index + 1;
        let result = parse_line(text, editor.session.units()).and_then(|step| match step {
            Some(step) => {
                debug!("Script line {}: {:?}", line, step);
                run_step(editor, &step).map(|()| true)
            }
            None => Ok(false),
        });
        match result {
            Ok(true) => report.succeeded += 1,
            Ok(false) => {}
            Err(error) => {
                let failure = ScriptFailure {
                    line,
                    text: text.trim().to_string(),
                    error,
                };
                if !keep_going {
                    return Err(failure);
                }
                warn!("{}", failure);
                report.failures.push(failure);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ObjectKind;
    use crate::config::Config;
    use crate::units::StandardUnits;

    const MM: i64 = 1_000_000;

    fn editor() -> Editor {
        Editor::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn parses_directives_and_commands() {
        let units = StandardUnits;
        assert_eq!(parse_line("  # note", &units), Ok(None));
        assert_eq!(parse_line("", &units), Ok(None));
        assert_eq!(
            parse_line("@click 10mm 2.5mm", &units),
            Ok(Some(ScriptStep::Directive(Directive::Click(Point::new(
                10 * MM,
                2_500_000
            )))))
        );
        assert_eq!(
            parse_line("@press 1000 2000 right", &units),
            Ok(Some(ScriptStep::Directive(Directive::Press(
                Point::new(1000, 2000),
                MouseButton::Right
            ))))
        );
        assert_eq!(
            parse_line("@mode hole", &units),
            Ok(Some(ScriptStep::Directive(Directive::Mode(
                EditorMode::PolygonHole
            ))))
        );
        assert_eq!(
            parse_line("Select(All)", &units),
            Ok(Some(ScriptStep::Command("Select(All)".into())))
        );
    }

    #[test]
    fn rejects_bad_directives() {
        let units = StandardUnits;
        assert_eq!(
            parse_line("@teleport", &units),
            Err(ScriptError::UnknownDirective("teleport".into()))
        );
        assert!(matches!(
            parse_line("@click 10mm", &units),
            Err(ScriptError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_line("@click 10qq 1mm", &units),
            Err(ScriptError::InvalidCoordinate { .. })
        ));
        assert_eq!(
            parse_line("@key Hyper", &units),
            Err(ScriptError::UnknownKey("Hyper".into()))
        );
        assert_eq!(
            parse_line("@mode sculpt", &units),
            Err(ScriptError::UnknownMode("sculpt".into()))
        );
    }

    #[test]
    fn coordinates_outside_the_board_range_are_rejected() {
        let units = StandardUnits;
        assert_eq!(
            parse_line("@press -5000000000000000000 0", &units),
            Err(ScriptError::InvalidCoordinate {
                token: "-5000000000000000000".into(),
                source: ValueError::OutOfRange,
            })
        );
        assert!(matches!(
            parse_line("@release 5000000000000000000 0", &units),
            Err(ScriptError::InvalidCoordinate { .. })
        ));

        let mut editor = editor();
        let report = run_script(
            &mut editor,
            "@press -10000000m 0\n@release 10000000m 0\n",
            true,
        )
        .unwrap();
        assert_eq!(report.failures.len(), 2);
        assert!(editor.session.board.is_empty());
    }

    #[test]
    fn draws_and_edits() {
        let mut editor = editor();
        let report = run_script(
            &mut editor,
            "@mode line\n\
             @click 10mm 10mm\n\
             @click 20mm 10mm\n\
             @cancel\n\
             @mode arrow\n\
             Select(All)\n\
             ChangeSize(Selected, =1mm)\n",
            false,
        )
        .unwrap();
        assert_eq!(report.succeeded, 7);
        let line = editor.session.board.objects().next().unwrap();
        assert_eq!(line.kind(), ObjectKind::Line);
        assert_eq!(line.shape.size(), Some(MM));
    }

    #[test]
    fn text_entry_and_key_combinations() {
        let mut editor = editor();
        run_script(
            &mut editor,
            "@mode text\n@click 5mm 5mm\n@type R1 GND\n@key Return\n@key Ctrl+Z\n@key Ctrl+Y\n",
            false,
        )
        .unwrap();
        assert_eq!(editor.session.board.count_kind(ObjectKind::Text), 1);
        assert_eq!(editor.modifiers(), crate::mode::Modifiers::new());
    }

    #[test]
    fn first_error_stops_without_keep_going() {
        let mut editor = editor();
        let failure = run_script(&mut editor, "Undo()\nFrob()\n@mode via\n", false).unwrap_err();
        assert_eq!(failure.line, 2);
        assert_eq!(failure.text, "Frob()");
        assert_eq!(editor.mode(), EditorMode::Arrow);
    }

    #[test]
    fn keep_going_collects_failures() {
        let mut editor = editor();
        let report = run_script(&mut editor, "Frob()\n@mode via\n@click 200mm 1mm\n", true).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(
            report.failures.iter().map(|f| f.line).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert!(matches!(
            report.failures[1].error,
            ScriptError::Mode(ModeError::GeometryRejected(_))
        ));
        assert_eq!(editor.mode(), EditorMode::Via);
    }
}
