//! Chamber tree nodes and toggle-set inheritance.

use crate::error::CoreError;
use crate::toggle::Toggle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// A named configuration tree node: a toggle set, child chambers, and the
/// flags controlling offline output.
///
/// A chamber exclusively owns its children and toggles; trees are built
/// fresh from a document and never mutated into a cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chamber {
    pub name: String,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub app: bool,
    #[serde(default)]
    pub toggles: BTreeMap<String, Toggle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Chamber>,
}

impl Chamber {
    /// Decode and validate a chamber document from raw bytes.
    ///
    /// Parsing is two-phase: serde produces the structural form, then
    /// [`Chamber::validate`] enforces the toggle/override invariants.
    /// Invalid documents are rejected whole.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let chamber: Chamber = serde_json::from_slice(bytes)?;
        chamber.validate()?;
        Ok(chamber)
    }

    /// Decode and validate a chamber document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, CoreError> {
        let chamber: Chamber = serde_json::from_reader(reader)?;
        chamber.validate()?;
        Ok(chamber)
    }

    /// Validate every toggle in this chamber and, recursively, in its
    /// children. Fails on the first violated invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        for toggle in self.toggles.values() {
            toggle.validate()?;
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }

    /// Merge a parent's toggle set into this chamber's: every parent entry
    /// is carried over, then overwritten/extended by the chamber's own
    /// toggles. The parent map is not mutated.
    #[must_use]
    pub fn inherit_with(&self, parent: &BTreeMap<String, Toggle>) -> BTreeMap<String, Toggle> {
        let mut merged = parent.clone();
        for (name, toggle) in &self.toggles {
            merged.insert(name.clone(), toggle.clone());
        }
        merged
    }
}
