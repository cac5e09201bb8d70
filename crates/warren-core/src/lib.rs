//! Warren core: chamber trees, typed toggles, and version-range overrides.
//!
//! A [`Chamber`] is a named configuration node holding a toggle set and
//! child chambers. A [`Toggle`] is a typed value plus an ordered sequence
//! of non-overlapping [`Override`]s bound to semantic-version ranges.
//! Documents are parsed in two phases: serde produces the structural form,
//! then an explicit `validate()` pass enforces the range/type invariants
//! before any document is accepted.

pub mod chamber;
pub mod compile;
pub mod error;
pub mod overrides;
pub mod toggle;
pub mod version;

pub use chamber::Chamber;
pub use compile::{compile, CompileError};
pub use error::CoreError;
pub use overrides::Override;
pub use toggle::{Toggle, ToggleKind, ToggleValue};
pub use version::ChamberVersion;
