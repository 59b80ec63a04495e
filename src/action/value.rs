//! Value specification parsing: `[=|+|-]<number>[ ]<unit>?`.
//!
//! A leading `=` makes the value absolute; anything else is a relative delta.
//! The parser only handles syntax. Suffix lookup and conversion go through the
//! session's [`UnitConverter`].

use crate::board::Coord;
use crate::session::Range;
use crate::units::{UnitConverter, UnitId};
use std::fmt;
use thiserror::Error;

/// Whether a value replaces or adjusts the current magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    Absolute,
    Relative,
}

/// A parsed magnitude, unit and mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSpec {
    /// Signed magnitude in `unit`
    pub magnitude: f64,
    pub unit: UnitId,
    pub mode: ValueMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("missing value")]
    Empty,

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unit suffix '{suffix}' conflicts with unit argument '{argument}'")]
    ConflictingUnits { suffix: String, argument: String },

    #[error("value does not fit the coordinate range")]
    OutOfRange,
}

/// A value converted to canonical units, ready to apply to targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedValue {
    Absolute(Coord),
    Relative(Coord),
}

impl ResolvedValue {
    /// New magnitude for a target currently at `current`, clamped to `range`.
    ///
    /// Relative values are added to each target's own magnitude; every
    /// result is clamped independently.
    pub fn apply(&self, current: Coord, range: Range) -> Coord {
        match *self {
            ResolvedValue::Absolute(value) => range.clamp(value),
            ResolvedValue::Relative(delta) => range.clamp(current.saturating_add(delta)),
        }
    }
}

impl ValueSpec {
    /// Parses a value token with an optional separate unit argument.
    ///
    /// # Arguments
    /// * `token` - The value, e.g. `=10mil`, `+0.5 mm`, `-1000`
    /// * `unit_arg` - Unit given as its own argument, e.g. `ChangeSize(Selected, 10, mil)`
    /// * `units` - Converter used to resolve unit names
    pub fn parse(
        token: &str,
        unit_arg: Option<&str>,
        units: &dyn UnitConverter,
    ) -> Result<Self, ValueError> {
        let token = token.trim();
        let (mode, body) = match token.strip_prefix('=') {
            Some(rest) => (ValueMode::Absolute, rest.trim_start()),
            None => (ValueMode::Relative, token),
        };
        if body.is_empty() {
            return Err(ValueError::Empty);
        }

        let number_end = body
            .char_indices()
            .find(|(idx, c)| !(c.is_ascii_digit() || *c == '.' || (*idx == 0 && (*c == '+' || *c == '-'))))
            .map_or(body.len(), |(idx, _)| idx);
        let (number, suffix) = body.split_at(number_end);
        let suffix = suffix.trim();

        if number.is_empty() || number == "+" || number == "-" || number == "." {
            return Err(ValueError::InvalidNumber(body.to_string()));
        }
        let magnitude: f64 = number
            .parse()
            .map_err(|_| ValueError::InvalidNumber(number.to_string()))?;

        let unit_arg = unit_arg.map(str::trim).filter(|u| !u.is_empty());
        let unit = match (suffix.is_empty(), unit_arg) {
            (true, None) => UnitId::Nm,
            (true, Some(arg)) => lookup(arg, units)?,
            (false, None) => lookup(suffix, units)?,
            (false, Some(arg)) => {
                let from_suffix = lookup(suffix, units)?;
                let from_arg = lookup(arg, units)?;
                if from_suffix != from_arg {
                    return Err(ValueError::ConflictingUnits {
                        suffix: suffix.to_string(),
                        argument: arg.to_string(),
                    });
                }
                from_suffix
            }
        };

        Ok(ValueSpec {
            magnitude,
            unit,
            mode,
        })
    }

    /// Converts the magnitude to canonical coordinates.
    pub fn resolve(&self, units: &dyn UnitConverter) -> Result<ResolvedValue, ValueError> {
        let canonical = units
            .to_canonical(self.magnitude, self.unit)
            .ok_or(ValueError::OutOfRange)?;
        Ok(match self.mode {
            ValueMode::Absolute => ResolvedValue::Absolute(canonical),
            ValueMode::Relative => ResolvedValue::Relative(canonical),
        })
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ValueMode::Absolute => write!(f, "={}{}", self.magnitude, self.unit),
            ValueMode::Relative => write!(f, "{:+}{}", self.magnitude, self.unit),
        }
    }
}

fn lookup(name: &str, units: &dyn UnitConverter) -> Result<UnitId, ValueError> {
    units
        .parse_unit(name)
        .ok_or_else(|| ValueError::UnknownUnit(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::StandardUnits;

    fn parse(token: &str) -> Result<ValueSpec, ValueError> {
        ValueSpec::parse(token, None, &StandardUnits)
    }

    #[test]
    fn leading_equals_is_absolute() {
        let spec = parse("=254000").unwrap();
        assert_eq!(spec.mode, ValueMode::Absolute);
        assert_eq!(spec.unit, UnitId::Nm);
        assert_eq!(
            spec.resolve(&StandardUnits).unwrap(),
            ResolvedValue::Absolute(254_000)
        );
    }

    #[test]
    fn missing_equals_is_relative() {
        let spec = parse("+1000").unwrap();
        assert_eq!(spec.mode, ValueMode::Relative);
        assert_eq!(
            spec.resolve(&StandardUnits).unwrap(),
            ResolvedValue::Relative(1000)
        );
        let spec = parse("-2 mil").unwrap();
        assert_eq!(
            spec.resolve(&StandardUnits).unwrap(),
            ResolvedValue::Relative(-50_800)
        );
        assert_eq!(parse("5").unwrap().mode, ValueMode::Relative);
    }

    #[test]
    fn unit_suffix_and_argument() {
        let spec = parse("=0.5mm").unwrap();
        assert_eq!(spec.unit, UnitId::Mm);
        let spec = ValueSpec::parse("10", Some("mil"), &StandardUnits).unwrap();
        assert_eq!(spec.unit, UnitId::Mil);
        let spec = ValueSpec::parse("10mil", Some("mils"), &StandardUnits).unwrap();
        assert_eq!(spec.unit, UnitId::Mil);
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!(parse(""), Err(ValueError::Empty));
        assert_eq!(parse("="), Err(ValueError::Empty));
        assert!(matches!(parse("abc"), Err(ValueError::InvalidNumber(_))));
        assert!(matches!(parse("1.2.3"), Err(ValueError::InvalidNumber(_))));
        assert_eq!(parse("=3 furlong"), Err(ValueError::UnknownUnit("furlong".into())));
        assert!(matches!(
            ValueSpec::parse("10mm", Some("mil"), &StandardUnits),
            Err(ValueError::ConflictingUnits { .. })
        ));
    }

    #[test]
    fn apply_clamps_each_result() {
        let range = Range { min: 100, max: 1000 };
        assert_eq!(ResolvedValue::Absolute(5000).apply(300, range), 1000);
        assert_eq!(ResolvedValue::Relative(500).apply(300, range), 800);
        assert_eq!(ResolvedValue::Relative(500).apply(900, range), 1000);
        assert_eq!(ResolvedValue::Relative(-500).apply(300, range), 100);
    }
}
