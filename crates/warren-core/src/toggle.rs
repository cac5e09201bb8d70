//! Typed feature toggles and their version-scoped resolution.

use crate::error::CoreError;
use crate::overrides::Override;
use crate::version::ChamberVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a toggle's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKind {
    Boolean,
    String,
    Number,
    Custom,
}

/// A toggle value as a closed tagged union; tag comparison replaces
/// runtime type inspection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToggleValue {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Anything else in the document (object, array, null); opaque to the
    /// core and validated by the consumer.
    Custom(serde_json::Value),
}

impl fmt::Display for ToggleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleValue::Boolean(b) => write!(f, "{}", b),
            ToggleValue::Number(n) => write!(f, "{}", n),
            ToggleValue::String(s) => write!(f, "{}", s),
            ToggleValue::Custom(v) => write!(f, "{}", v),
        }
    }
}

/// A named, typed configuration value with optional version-range
/// overrides, ordered ascending and non-overlapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToggleKind,
    pub value: ToggleValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<Override>,
}

impl Toggle {
    /// Whether `value`'s variant matches the declared kind. `Custom`
    /// accepts no value through this check.
    #[must_use]
    pub fn is_valid_value(&self, value: &ToggleValue) -> bool {
        matches!(
            (self.kind, value),
            (ToggleKind::Boolean, ToggleValue::Boolean(_))
                | (ToggleKind::String, ToggleValue::String(_))
                | (ToggleKind::Number, ToggleValue::Number(_))
        )
    }

    /// Check the toggle invariants: the base value and every override value
    /// match the declared kind, every override range is well-formed, and
    /// consecutive overrides do not overlap.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.is_valid_value(&self.value) {
            return Err(self.type_mismatch(&self.value));
        }

        let mut previous: Option<&Override> = None;
        for current in &self.overrides {
            current.validate()?;

            if let Some(prev) = previous {
                if prev.overlaps_onto(current) {
                    return Err(CoreError::OverlappingOverride {
                        max: prev.maximum_version.clone(),
                        min: current.minimum_version.clone(),
                    });
                }
            }

            if !self.is_valid_value(&current.value) {
                return Err(self.type_mismatch(&current.value));
            }

            previous = Some(current);
        }

        Ok(())
    }

    /// The first stored override whose range contains `version`.
    ///
    /// Validation keeps ranges disjoint, so at most one can match;
    /// first-match is a safety net rather than a tie-break rule.
    #[must_use]
    pub fn override_for(&self, version: &ChamberVersion) -> Option<&Override> {
        self.overrides.iter().find(|o| o.contains(version))
    }

    /// The effective value at `version`: the matching override's value if
    /// one exists, otherwise the base value. No version resolves to the
    /// base value.
    #[must_use]
    pub fn resolve(&self, version: Option<&ChamberVersion>) -> &ToggleValue {
        if let Some(version) = version {
            if let Some(matched) = self.override_for(version) {
                return &matched.value;
            }
        }
        &self.value
    }

    fn type_mismatch(&self, value: &ToggleValue) -> CoreError {
        CoreError::TypeMismatch {
            value: value.to_string(),
            kind: self.kind,
            toggle: self.name.clone(),
        }
    }
}
