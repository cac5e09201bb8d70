//! Offline build: flatten inherited toggle sets into per-node artifacts.

use crate::chamber::Chamber;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Failures while emitting build artifacts; fatal to the offline run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to serialize chamber {name:?}: {source}")]
    Serialize {
        name: String,
        source: serde_json::Error,
    },

    #[error("failed to write artifact {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Walk the chamber tree depth-first, flattening inherited toggles
/// top-down and emitting `<name>.json` for every buildable/app node.
///
/// Each child's toggle set is replaced in place with the merged view
/// before recursing; the flattening happens once, it is not a live view.
/// Children are visited in stored order.
pub fn compile(parent: &mut Chamber, out_dir: &Path) -> Result<(), CompileError> {
    if parent.buildable || parent.app {
        let path = out_dir.join(format!("{}.json", parent.name));
        let bytes = serde_json::to_vec_pretty(parent).map_err(|source| {
            CompileError::Serialize {
                name: parent.name.clone(),
                source,
            }
        })?;
        fs::write(&path, bytes).map_err(|source| CompileError::Write {
            path: path.clone(),
            source,
        })?;
        info!(chamber = %parent.name, path = %path.display(), "wrote build artifact");
    }

    let parent_toggles = parent.toggles.clone();
    for child in &mut parent.children {
        child.toggles = child.inherit_with(&parent_toggles);
        compile(child, out_dir)?;
    }

    Ok(())
}
