//! Validation and decode errors for chamber documents.

use crate::toggle::ToggleKind;
use thiserror::Error;

/// Errors surfaced while decoding or validating a chamber document.
///
/// Validation aborts acceptance of the offending document; a chamber is
/// never partially applied.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The string is not a `vMAJOR.MINOR.PATCH[-prerelease]` version.
    #[error("invalid semantic version {0:?}")]
    InvalidVersion(String),

    /// An override left both range endpoints empty.
    #[error("override ranges cannot both be empty")]
    InvalidRange,

    /// Adjacent overrides' version ranges overlap.
    #[error("an override with maximum version {max} is semantically greater than the next override's minimum version ({min})")]
    OverlappingOverride { max: String, min: String },

    /// A value's runtime type disagrees with the toggle's declared type.
    #[error("{value} is not of the type {kind:?} from the toggle: {toggle}")]
    TypeMismatch {
        value: String,
        kind: ToggleKind,
        toggle: String,
    },

    /// The input was not a well-formed chamber document.
    #[error("failed to decode chamber document: {0}")]
    Decode(#[from] serde_json::Error),
}
