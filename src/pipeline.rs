//! Turns a parsed model and the current appearance settings into a scene that
//! is ready to display.
//!
//! `prepare` is a pure function of its inputs: the parsed model is never
//! modified, so the same model can be prepared again whenever appearance
//! settings change.
mod materials;
mod normalize;
mod stats;

pub use materials::*;
pub use normalize::*;
pub use stats::*;

use thiserror::Error;
use tracing::debug;

use crate::{appearance::Appearance, content::ParsedModel, scene::SceneGraph};

/// Size of the largest dimension of a model after normalization.
pub const TARGET_SIZE: f32 = 2.0;

/// A normalized scene graph where every mesh has a resolved material.
#[derive(Clone, Debug)]
pub struct PreparedScene {
    pub graph: SceneGraph,
    pub summary: ModelSummary,
    pub normalization: Normalization,
}

/// Prepare `model` for display using the default target size.
pub fn prepare(
    model: &ParsedModel,
    appearance: &Appearance,
) -> Result<PreparedScene, PipelineError> {
    prepare_with_target_size(model, appearance, TARGET_SIZE)
}

/// Prepare `model` for display: count its vertices and faces, fit it into a
/// `target_size` cube centered on the origin, and resolve mesh materials.
pub fn prepare_with_target_size(
    model: &ParsedModel,
    appearance: &Appearance,
    target_size: f32,
) -> Result<PreparedScene, PipelineError> {
    let mut graph = model.graph.clone();

    let summary = summarize(&graph);
    let normalization = normalize(&mut graph, target_size)?;
    apply_materials(&mut graph, model.materials.as_ref(), appearance);

    debug!(
        "prepared `{}`: {summary}, scale {}",
        model.name, normalization.scale
    );

    Ok(PreparedScene {
        graph,
        summary,
        normalization,
    })
}

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
