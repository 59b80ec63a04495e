//! Configuration enum types.

use crate::action::{ResolvedValue, ValueError, ValueSpec};
use crate::board::Coord;
use crate::units::StandardUnits;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension specification: either canonical units or a string with a unit.
///
/// # Examples
/// ```toml
/// # Canonical units (nanometres)
/// line_thickness = 254000
///
/// # Any unit the value parser understands
/// line_thickness = "10mil"
/// via_drill = "0.5 mm"
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum DimensionSpec {
    /// Raw canonical value (1 = one nanometre)
    Canonical(i64),
    /// Number with a unit suffix: nm, um, mm, cm, mil, in
    Text(String),
}

impl DimensionSpec {
    /// Resolves to canonical coordinates.
    ///
    /// A leading `=` is accepted and ignored; signs are kept so validation
    /// can reject negative dimensions.
    pub fn resolve(&self) -> Result<Coord, ValueError> {
        match self {
            DimensionSpec::Canonical(value) => Ok(*value),
            DimensionSpec::Text(text) => {
                let spec = ValueSpec::parse(text, None, &StandardUnits)?;
                match spec.resolve(&StandardUnits)? {
                    ResolvedValue::Absolute(v) | ResolvedValue::Relative(v) => Ok(v),
                }
            }
        }
    }

    /// Canonical value, or `fallback` with a warning when the text does not parse.
    pub fn to_coord(&self, fallback: Coord) -> Coord {
        self.resolve().unwrap_or_else(|err| {
            warn!("Invalid dimension '{}': {}, using {}", self, err, fallback);
            fallback
        })
    }
}

impl From<Coord> for DimensionSpec {
    fn from(value: Coord) -> Self {
        DimensionSpec::Canonical(value)
    }
}

impl From<&str> for DimensionSpec {
    fn from(value: &str) -> Self {
        DimensionSpec::Text(value.to_string())
    }
}

impl fmt::Display for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionSpec::Canonical(value) => write!(f, "{value}"),
            DimensionSpec::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_units_and_raw_values() {
        assert_eq!(DimensionSpec::from("10mil").resolve(), Ok(254_000));
        assert_eq!(DimensionSpec::from("=0.5 mm").resolve(), Ok(500_000));
        assert_eq!(DimensionSpec::from(1234).resolve(), Ok(1234));
    }

    #[test]
    fn bad_text_falls_back() {
        let spec = DimensionSpec::from("ten mils");
        assert!(spec.resolve().is_err());
        assert_eq!(spec.to_coord(42), 42);
    }

    #[test]
    fn deserializes_either_form() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: DimensionSpec,
            b: DimensionSpec,
        }
        let parsed: Wrapper = toml::from_str("a = 100\nb = \"2mm\"").unwrap();
        assert_eq!(parsed.a, DimensionSpec::Canonical(100));
        assert_eq!(parsed.b, DimensionSpec::Text("2mm".into()));
    }
}
