//! File-writing boundary: persist projected column artifacts into a directory
//! named after the input file's base name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CollimateResult;

use super::{ArtifactPayload, ColumnArtifact};

/// Output directory for an input file: its base name without extension, resolved
/// next to the input.
pub fn output_dir_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "columns".to_string());
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(stem),
        _ => PathBuf::from(stem),
    }
}

/// Write every artifact (and its sidecar, if any) into `dir`, creating the
/// directory if absent.
pub fn write_artifacts(dir: &Path, artifacts: &[ColumnArtifact]) -> CollimateResult<()> {
    fs::create_dir_all(dir)?;

    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        match &artifact.payload {
            ArtifactPayload::Binary(bytes) => fs::write(&path, bytes)?,
            ArtifactPayload::Json(text) => fs::write(&path, text)?,
        }
        if let Some(sidecar) = &artifact.sidecar {
            fs::write(dir.join(&sidecar.file_name), &sidecar.json)?;
        }
    }

    Ok(())
}
