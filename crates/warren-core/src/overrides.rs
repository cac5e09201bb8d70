//! Version-range overrides for toggle values.

use crate::error::CoreError;
use crate::toggle::ToggleValue;
use crate::version::ChamberVersion;
use serde::{Deserialize, Serialize};

/// A toggle value restricted to an inclusive semantic-version range.
///
/// An empty endpoint means the range is unbounded in that direction;
/// only a range with both endpoints empty is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub minimum_version: String,
    pub maximum_version: String,
    pub value: ToggleValue,
}

impl Override {
    /// Check the range invariants: at least one endpoint present, and
    /// every present endpoint a parsable semantic version.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.minimum_version.is_empty() && self.maximum_version.is_empty() {
            return Err(CoreError::InvalidRange);
        }
        ChamberVersion::parse_endpoint(&self.minimum_version)?;
        ChamberVersion::parse_endpoint(&self.maximum_version)?;
        Ok(())
    }

    /// True iff `minimum_version <= version <= maximum_version`, with an
    /// empty endpoint imposing no bound in that direction.
    pub fn contains(&self, version: &ChamberVersion) -> bool {
        let above_min = match self.min_bound() {
            Some(min) => min <= *version,
            None => true,
        };
        let below_max = match self.max_bound() {
            Some(max) => *version <= max,
            None => true,
        };
        above_min && below_max
    }

    /// True iff this override's maximum reaches past `next`'s minimum.
    ///
    /// An empty minimum on `next` counts as reaching all the way down, so
    /// any bounded maximum before it overlaps.
    pub fn overlaps_onto(&self, next: &Override) -> bool {
        match self.max_bound() {
            Some(max) => match next.min_bound() {
                Some(min) => max > min,
                None => true,
            },
            None => false,
        }
    }

    // Unparsable endpoints only occur pre-validation; they are treated as
    // absent bounds rather than panicking mid-comparison.
    fn min_bound(&self) -> Option<ChamberVersion> {
        ChamberVersion::parse_endpoint(&self.minimum_version)
            .ok()
            .flatten()
    }

    fn max_bound(&self) -> Option<ChamberVersion> {
        ChamberVersion::parse_endpoint(&self.maximum_version)
            .ok()
            .flatten()
    }
}
