use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::{
    platform::load_as_string,
    scene::{MtlLibrary, SceneGraph},
};

mod obj_model;

pub use obj_model::{create_material, generate_normals, parse_material_library, parse_model};

/// The output of the obj parser before any normalization or material
/// resolution has been applied.
#[derive(Clone, Debug)]
pub struct ParsedModel {
    /// Display name of the model, usually its file name.
    pub name: String,
    pub graph: SceneGraph,
    /// Materials from the .mtl library loaded with the model, if any.
    pub materials: Option<MtlLibrary>,
}

/// A file the user asked to open, classified by its extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSelection {
    /// A Wavefront .obj model.
    Model(PathBuf),
    /// A .mtl material library.
    MaterialLibrary(PathBuf),
}

impl FileSelection {
    /// Classify `path` by its extension (case insensitive). Files that are not
    /// .obj or .mtl files are rejected.
    pub fn classify(path: impl Into<PathBuf>) -> Result<Self, FileSelectionError> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("obj") => Ok(Self::Model(path)),
            Some("mtl") => Ok(Self::MaterialLibrary(path)),
            _ => Err(FileSelectionError::UnsupportedExtension(path)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Model(path) | Self::MaterialLibrary(path) => path,
        }
    }
}

/// Read a file selected by the user to completion.
#[tracing::instrument(level = "info")]
pub async fn read_selection(selection: &FileSelection) -> Result<String, ContentError> {
    let text = load_as_string(selection.path()).await?;
    info!("read {} bytes from {:?}", text.len(), selection.path());
    Ok(text)
}

/// Display name for a model loaded from `path`.
pub fn model_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("model")
        .to_string()
}

#[derive(Debug, Error)]
pub enum FileSelectionError {
    #[error("please choose a valid .obj model or .mtl material file, {0:?} is neither")]
    UnsupportedExtension(PathBuf),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error("internal content error: {0}")]
    Internal(&'static str),
}
