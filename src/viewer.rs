//! The viewer's state: the loaded model, the user's appearance settings and the
//! camera, plus the bookkeeping that decides when the displayed scene must be
//! rebuilt.
//!
//! Every successful load and every settings change bumps the scene version.
//! The prepared scene is recomputed from the parsed model and the appearance
//! settings only when the version it was built for is out of date.
mod commands;

pub use commands::*;

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    appearance::Appearance,
    camera::Camera,
    camera_controller::{CameraController, OrbitCameraController},
    config::ViewerConfig,
    content::{
        self, model_name, parse_material_library, parse_model, ContentError, FileSelection,
        FileSelectionError, ParsedModel,
    },
    lighting::{LightBuilder, LightError},
    pipeline::{self, ModelSummary, PipelineError, PreparedScene},
};

/// A surface that displays prepared scenes.
pub trait RenderSurface {
    /// Attach a newly prepared scene for display. The previously attached
    /// scene has already been detached.
    fn attach(&mut self, scene: &PreparedScene, appearance: &Appearance) -> anyhow::Result<()>;

    /// Release the currently attached scene, if any.
    fn detach(&mut self);

    /// Apply background and light settings. Called on every version change,
    /// including when no scene is loaded.
    fn set_appearance(&mut self, _appearance: &Appearance) {}
}

/// Issued when a file load starts. Only the most recently issued ticket can
/// complete a load; results for older tickets are ignored.
#[derive(Debug)]
pub struct LoadTicket {
    id: u64,
    selection: FileSelection,
}

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }
}

/// What happened when a load finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A model is loaded and ready to display.
    Loaded(ModelSummary),
    /// A material library was read but there is no model to apply it to yet.
    MaterialsPending,
    /// A newer load was started before this one finished.
    Stale,
}

/// Model text kept so the model can be parsed again when a material library
/// arrives after it.
#[derive(Clone, Debug)]
struct ModelSource {
    name: String,
    obj_text: String,
}

pub struct ViewerState {
    target_size: f32,
    appearance: Appearance,
    camera: Camera,
    camera_controller: OrbitCameraController,
    source: Option<ModelSource>,
    /// Material library text of the current model.
    mtl_text: Option<String>,
    /// Material library loaded while no model was loaded. The next model
    /// consumes it.
    pending_mtl_text: Option<String>,
    model: Option<ParsedModel>,
    prepared: Option<PreparedScene>,
    /// Version `prepared` was built for.
    prepared_version: u64,
    /// Version last attached to a render surface.
    displayed_version: Option<u64>,
    version: u64,
    last_ticket: u64,
    last_error: Option<String>,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            target_size: config.target_size,
            appearance: config.appearance.clone(),
            camera: Camera::new(
                config.camera_eye,
                config.camera_target,
                glam::Vec3::Y,
                config.fov_y_degrees.to_radians(),
                0.1,
                1000.0,
                config.window_width,
                config.window_height,
            ),
            camera_controller: OrbitCameraController::new(),
            source: None,
            mtl_text: None,
            pending_mtl_text: None,
            model: None,
            prepared: None,
            prepared_version: 0,
            displayed_version: None,
            version: 0,
            last_ticket: 0,
            last_error: None,
        }
    }

    /// Check that `path` is a file the viewer can open and issue a ticket for
    /// loading it. Rejected files leave the viewer state untouched.
    pub fn begin_load(
        &mut self,
        path: impl Into<std::path::PathBuf>,
    ) -> Result<LoadTicket, ViewerError> {
        let selection = FileSelection::classify(path)?;

        self.last_ticket += 1;
        debug!("issued load ticket {} for {selection:?}", self.last_ticket);

        Ok(LoadTicket {
            id: self.last_ticket,
            selection,
        })
    }

    /// Read the file named by `ticket` to completion and apply it.
    pub async fn load(&mut self, ticket: LoadTicket) -> Result<LoadOutcome, ViewerError> {
        let text = content::read_selection(ticket.selection()).await;
        self.finish_load(ticket, text).await
    }

    /// Apply the text read for `ticket`.
    ///
    /// Results for tickets older than the most recently issued one are
    /// discarded. A load that fails keeps the previously loaded model and
    /// records the error.
    pub async fn finish_load(
        &mut self,
        ticket: LoadTicket,
        text: Result<String, ContentError>,
    ) -> Result<LoadOutcome, ViewerError> {
        if ticket.id < self.last_ticket {
            info!(
                "ignoring stale load of {:?} (ticket {} < {})",
                ticket.selection.path(),
                ticket.id,
                self.last_ticket
            );
            return Ok(LoadOutcome::Stale);
        }

        let result = match text {
            Ok(text) => self.apply_loaded_text(&ticket.selection, text).await,
            Err(e) => Err(ViewerError::from(e)),
        };

        match &result {
            Ok(outcome) => {
                info!("loaded {:?}: {outcome:?}", ticket.selection.path());
                self.last_error = None;
            }
            Err(e) => {
                warn!("failed to load {:?}: {e}", ticket.selection.path());
                self.last_error = Some(e.to_string());
            }
        }

        result
    }

    async fn apply_loaded_text(
        &mut self,
        selection: &FileSelection,
        text: String,
    ) -> Result<LoadOutcome, ViewerError> {
        match selection {
            FileSelection::Model(path) => {
                let source = ModelSource {
                    name: model_name(path),
                    obj_text: text,
                };
                // A newly loaded model never inherits the previous model's
                // library, only one that is waiting for a model.
                let mtl_text = self.pending_mtl_text.clone();
                let summary = self.commit_model(source, mtl_text).await?;
                Ok(LoadOutcome::Loaded(summary))
            }
            FileSelection::MaterialLibrary(_) => {
                // Reject libraries that fail to parse before replacing the
                // current one.
                let library = parse_material_library(&text)?;
                debug!("material library defines {} materials", library.len());

                match self.source.clone() {
                    Some(source) => {
                        let summary = self.commit_model(source, Some(text)).await?;
                        Ok(LoadOutcome::Loaded(summary))
                    }
                    None => {
                        self.pending_mtl_text = Some(text);
                        Ok(LoadOutcome::MaterialsPending)
                    }
                }
            }
        }
    }

    /// Parse and prepare a model, replacing the current model only if both
    /// steps succeed.
    async fn commit_model(
        &mut self,
        source: ModelSource,
        mtl_text: Option<String>,
    ) -> Result<ModelSummary, ViewerError> {
        let model = parse_model(&source.name, &source.obj_text, mtl_text.as_deref()).await?;
        let prepared =
            pipeline::prepare_with_target_size(&model, &self.appearance, self.target_size)?;
        let summary = prepared.summary;

        self.source = Some(source);
        self.mtl_text = mtl_text;
        self.pending_mtl_text = None;
        self.model = Some(model);
        self.prepared = Some(prepared);
        self.version += 1;
        self.prepared_version = self.version;

        Ok(summary)
    }

    /// Apply a user command. Commands that change appearance bump the scene
    /// version.
    pub fn apply(&mut self, command: ViewerCommand) -> Result<(), ViewerError> {
        let appearance = &mut self.appearance;

        match command {
            ViewerCommand::SetBackground(color) => appearance.background = color,
            ViewerCommand::CycleBackground => {
                appearance.background = next_in_palette(BACKGROUND_PALETTE, appearance.background)
            }
            ViewerCommand::SetAmbientIntensity(intensity) => {
                appearance.set_ambient_intensity(intensity)
            }
            ViewerCommand::AdjustAmbientIntensity(step) => {
                appearance.set_ambient_intensity(appearance.ambient_intensity() + step)
            }
            ViewerCommand::SetFlatColor(color) => appearance.flat_color = color,
            ViewerCommand::CycleFlatColor => {
                appearance.flat_color = next_in_palette(FLAT_COLOR_PALETTE, appearance.flat_color)
            }
            ViewerCommand::SetWireframe(wireframe) => appearance.wireframe = wireframe,
            ViewerCommand::ToggleWireframe => appearance.wireframe = !appearance.wireframe,
            ViewerCommand::AddLight(light) => {
                let id = appearance.lights.add(light);
                debug!("added {id}");
            }
            ViewerCommand::AddLightAtCamera => {
                let id = appearance
                    .lights
                    .add(LightBuilder::point(self.camera.eye()));
                debug!("added {id} at camera position");
            }
            ViewerCommand::RemoveLight(id) => {
                appearance.lights.remove(id)?;
            }
            ViewerCommand::RemoveLastLight => {
                if let Some(id) = appearance.lights.last().map(|l| l.id()) {
                    appearance.lights.remove(id)?;
                } else {
                    return Ok(());
                }
            }
            ViewerCommand::SetLightPosition(id, position) => {
                appearance.lights.set_position(id, position)?
            }
            ViewerCommand::SetLightIntensity(id, intensity) => {
                appearance.lights.set_intensity(id, intensity.max(0.0))?
            }
            ViewerCommand::SetLightColor(id, color) => appearance.lights.set_color(id, color)?,
            ViewerCommand::AdjustLastLightIntensity(step) => {
                match appearance.lights.last().map(|l| (l.id(), l.intensity)) {
                    Some((id, intensity)) => appearance
                        .lights
                        .set_intensity(id, (intensity + step).max(0.0))?,
                    None => return Ok(()),
                }
            }
            ViewerCommand::ResetCamera => {
                self.camera_controller.reset(&mut self.camera);
                return Ok(());
            }
        }

        self.version += 1;
        Ok(())
    }

    /// The scene for the current version, recomputing it if settings changed
    /// since it was last prepared. `None` until a model is loaded.
    pub fn prepared(&mut self) -> Option<&PreparedScene> {
        if self.prepared_version != self.version {
            if let Some(model) = &self.model {
                match pipeline::prepare_with_target_size(
                    model,
                    &self.appearance,
                    self.target_size,
                ) {
                    Ok(prepared) => self.prepared = Some(prepared),
                    Err(e) => {
                        warn!("failed to prepare scene: {e}");
                        self.last_error = Some(e.to_string());
                    }
                }
            }

            self.prepared_version = self.version;
        }

        self.prepared.as_ref()
    }

    /// Bring `surface` up to date with the current scene version. The
    /// previously displayed scene is detached before the new one is attached.
    pub fn sync_surface(&mut self, surface: &mut dyn RenderSurface) -> anyhow::Result<()> {
        if self.displayed_version == Some(self.version) {
            return Ok(());
        }

        let version = self.version;
        surface.detach();
        surface.set_appearance(&self.appearance);

        if let Some(prepared) = self.prepared().cloned() {
            surface.attach(&prepared, &self.appearance)?;
        }

        self.displayed_version = Some(version);
        Ok(())
    }

    /// Forward a window event to the camera controller.
    pub fn camera_input(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.camera_controller.process_input(event)
    }

    pub fn mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.camera_controller
            .process_mouse_motion(Vec2::new(delta_x as f32, delta_y as f32));
    }

    pub fn mouse_scroll_wheel(&mut self, delta_x: f64, delta_y: f64) {
        self.camera_controller
            .process_mouse_wheel(Vec2::new(delta_x as f32, delta_y as f32));
    }

    /// Advance the camera by `delta`.
    pub fn update_camera(&mut self, delta: Duration) {
        self.camera_controller.update_camera(&mut self.camera, delta);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera
            .set_viewport_size(width, height)
            .unwrap_or_else(|e| warn!("{e}"));
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn summary(&self) -> Option<ModelSummary> {
        self.prepared.as_ref().map(|p| p.summary)
    }

    pub fn model_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }

    /// True if the current model was loaded with a material library.
    pub fn has_material_library(&self) -> bool {
        self.mtl_text.is_some()
    }

    /// True if a material library is waiting for the next model.
    pub fn has_pending_material_library(&self) -> bool {
        self.pending_mtl_text.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// A one line description of the viewer state for the window title.
    pub fn status_line(&self) -> String {
        match (&self.last_error, self.model_name(), self.summary()) {
            (Some(e), _, _) => format!("error: {e}"),
            (None, Some(name), Some(summary)) => format!("{name} ({summary})"),
            _ => "drop an .obj file here".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Selection(#[from] FileSelectionError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Light(#[from] LightError),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use glam::Vec3;

    use super::*;
    use crate::{color::Color, scene::Side};

    const CUBE_OBJ: &str = "\
o cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
usemtl Red
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

    const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 4 0 0
v 0 2 0
f 1 2 3
";

    const RED_MTL: &str = "\
newmtl Red
Kd 1 0 0
";

    /// Records what a render surface was asked to do.
    #[derive(Default)]
    struct RecordingSurface {
        events: Vec<String>,
        background: Option<String>,
    }

    impl RenderSurface for RecordingSurface {
        fn attach(&mut self, scene: &PreparedScene, _: &Appearance) -> anyhow::Result<()> {
            self.events.push(format!("attach {}", scene.summary.face_count));
            Ok(())
        }

        fn detach(&mut self) {
            self.events.push("detach".to_string());
        }

        fn set_appearance(&mut self, appearance: &Appearance) {
            self.background = Some(appearance.background.to_hex());
        }
    }

    fn new_state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    fn finish(state: &mut ViewerState, path: &str, text: &str) -> Result<LoadOutcome, ViewerError> {
        let ticket = state.begin_load(path).unwrap();
        pollster::block_on(state.finish_load(ticket, Ok(text.to_string())))
    }

    fn mesh_colors(state: &mut ViewerState) -> Vec<String> {
        state
            .prepared()
            .unwrap()
            .graph
            .meshes()
            .iter()
            .map(|m| m.node.material.as_ref().unwrap().color.to_hex())
            .collect()
    }

    #[test]
    fn loading_a_model_reports_summary() {
        let mut state = new_state();

        let outcome = finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        assert_eq!(
            LoadOutcome::Loaded(ModelSummary {
                vertex_count: 8,
                face_count: 12
            }),
            outcome
        );
        assert_eq!(1, state.version());
        assert_eq!("cube.obj (8 vertices, 12 faces)", state.status_line());
    }

    #[test]
    fn rejected_file_changes_nothing() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        assert!(matches!(
            state.begin_load("cube.png"),
            Err(ViewerError::Selection(_))
        ));
        assert_eq!(1, state.version());
        assert_eq!(None, state.last_error());
        assert_eq!(Some("cube.obj"), state.model_name());
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut state = new_state();

        let first = state.begin_load("cube.obj").unwrap();
        let second = state.begin_load("triangle.obj").unwrap();
        assert!(second.id() > first.id());

        let outcome =
            pollster::block_on(state.finish_load(second, Ok(TRIANGLE_OBJ.to_string()))).unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded(_)));

        let outcome =
            pollster::block_on(state.finish_load(first, Ok(CUBE_OBJ.to_string()))).unwrap();
        assert_eq!(LoadOutcome::Stale, outcome);
        assert_eq!(Some("triangle.obj"), state.model_name());
        assert_eq!(1, state.summary().unwrap().face_count);
    }

    #[test]
    fn failed_load_keeps_previous_model() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        // A file with no geometry fails normalization.
        let result = finish(&mut state, "empty.obj", "# nothing here\n");
        assert!(matches!(
            result,
            Err(ViewerError::Pipeline(PipelineError::InvalidGeometry(_)))
        ));
        assert!(state.last_error().is_some());
        assert_eq!(Some("cube.obj"), state.model_name());
        assert_eq!(1, state.version());

        // A read failure is also recoverable.
        let ticket = state.begin_load("gone.obj").unwrap();
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let result = pollster::block_on(state.finish_load(ticket, Err(io_error.into())));
        assert!(matches!(result, Err(ViewerError::Content(_))));
        assert_eq!(8, state.summary().unwrap().vertex_count);

        // The next successful load clears the error.
        finish(&mut state, "triangle.obj", TRIANGLE_OBJ).unwrap();
        assert_eq!(None, state.last_error());
    }

    #[test]
    fn flat_color_applies_without_material_library() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        state
            .apply(ViewerCommand::SetFlatColor(Color::from_hex("#ff0000").unwrap()))
            .unwrap();

        assert_eq!(vec!["#ff0000"], mesh_colors(&mut state));
    }

    #[test]
    fn material_library_after_model_is_applied() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        state
            .apply(ViewerCommand::SetFlatColor(Color::from_hex("#00ff00").unwrap()))
            .unwrap();

        let outcome = finish(&mut state, "cube.mtl", RED_MTL).unwrap();

        assert!(matches!(outcome, LoadOutcome::Loaded(_)));
        assert!(state.has_material_library());
        assert_eq!(vec!["#ff0000"], mesh_colors(&mut state));

        let side = state.prepared().unwrap().graph.meshes()[0]
            .node
            .material
            .as_ref()
            .unwrap()
            .side;
        assert_eq!(Side::Double, side);
    }

    #[test]
    fn material_library_before_model_is_pending() {
        let mut state = new_state();

        let outcome = finish(&mut state, "cube.mtl", RED_MTL).unwrap();
        assert_eq!(LoadOutcome::MaterialsPending, outcome);
        assert_eq!(0, state.version());

        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        assert_eq!(vec!["#ff0000"], mesh_colors(&mut state));
    }

    #[test]
    fn material_library_does_not_carry_over_to_next_model() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        finish(&mut state, "cube.mtl", RED_MTL).unwrap();
        assert!(state.has_material_library());

        finish(&mut state, "triangle.obj", TRIANGLE_OBJ).unwrap();
        assert!(!state.has_material_library());

        state
            .apply(ViewerCommand::SetFlatColor(Color::from_hex("#00ff00").unwrap()))
            .unwrap();
        assert_eq!(vec!["#00ff00"], mesh_colors(&mut state));
    }

    #[test]
    fn pending_material_library_is_used_once() {
        let mut state = new_state();
        finish(&mut state, "cube.mtl", RED_MTL).unwrap();
        assert!(state.has_pending_material_library());

        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        assert!(!state.has_pending_material_library());
        assert!(state.has_material_library());

        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        assert!(!state.has_material_library());
        assert_eq!(vec!["#ffffff"], mesh_colors(&mut state));
    }

    #[test]
    fn parse_error_keeps_previous_model() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        let version = state.version();

        let result = finish(&mut state, "broken.obj", "v 0 0 0\nf 1 2 99\n");

        assert!(matches!(
            result,
            Err(ViewerError::Content(ContentError::Parse(_)))
        ));
        assert!(state.last_error().is_some());
        assert_eq!(Some("cube.obj"), state.model_name());
        assert_eq!(version, state.version());
        assert_eq!(8, state.summary().unwrap().vertex_count);
    }

    #[test]
    fn set_commands_change_settings() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        let v0 = state.version();
        state.apply(ViewerCommand::SetAmbientIntensity(1.5)).unwrap();
        assert_eq!(v0 + 1, state.version());
        assert!((state.appearance().ambient_intensity() - 1.5).abs() < 1e-6);

        // Out of range intensities are clamped.
        state.apply(ViewerCommand::SetAmbientIntensity(7.0)).unwrap();
        assert_eq!(2.0, state.appearance().ambient_intensity());

        let v1 = state.version();
        state.apply(ViewerCommand::SetWireframe(true)).unwrap();
        assert_eq!(v1 + 1, state.version());
        assert!(state.appearance().wireframe);
        let all_wireframe = state
            .prepared()
            .unwrap()
            .graph
            .meshes()
            .iter()
            .all(|m| m.node.material.as_ref().unwrap().wireframe);
        assert!(all_wireframe);
    }

    #[test]
    fn light_commands_only_change_the_targeted_light() {
        let mut state = new_state();
        let original = state.appearance().lights.last().unwrap().clone();

        state
            .apply(ViewerCommand::AddLight(LightBuilder::point(Vec3::ZERO)))
            .unwrap();
        let target = state.appearance().lights.last().unwrap().id();
        let version = state.version();

        state
            .apply(ViewerCommand::SetLightPosition(target, Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        state
            .apply(ViewerCommand::SetLightIntensity(target, 0.25))
            .unwrap();
        state
            .apply(ViewerCommand::SetLightColor(
                target,
                Color::from_hex("#0000ff").unwrap(),
            ))
            .unwrap();
        assert_eq!(version + 3, state.version());

        let lights = &state.appearance().lights;
        let light = lights.get(target).unwrap();
        assert_eq!(Vec3::new(1.0, 2.0, 3.0), light.position);
        assert_eq!(0.25, light.intensity);
        assert_eq!("#0000ff", light.color.to_hex());

        // The default light is untouched.
        assert_eq!(Some(&original), lights.get(original.id()));

        // Negative intensities are clamped to zero.
        state
            .apply(ViewerCommand::SetLightIntensity(target, -1.0))
            .unwrap();
        assert_eq!(0.0, state.appearance().lights.get(target).unwrap().intensity);
    }

    #[test]
    fn wireframe_toggle_reaches_every_mesh() {
        let mut state = new_state();
        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();

        state.apply(ViewerCommand::ToggleWireframe).unwrap();
        let all_wireframe = state
            .prepared()
            .unwrap()
            .graph
            .meshes()
            .iter()
            .all(|m| m.node.material.as_ref().unwrap().wireframe);
        assert!(all_wireframe);

        state.apply(ViewerCommand::ToggleWireframe).unwrap();
        let none_wireframe = state
            .prepared()
            .unwrap()
            .graph
            .meshes()
            .iter()
            .all(|m| !m.node.material.as_ref().unwrap().wireframe);
        assert!(none_wireframe);
    }

    #[test]
    fn settings_changes_bump_version() {
        let mut state = new_state();
        let v0 = state.version();

        state.apply(ViewerCommand::AdjustAmbientIntensity(0.1)).unwrap();
        state.apply(ViewerCommand::CycleBackground).unwrap();
        state.apply(ViewerCommand::AddLightAtCamera).unwrap();

        assert_eq!(v0 + 3, state.version());
        assert_eq!(2, state.appearance().lights.len());
        assert!((state.appearance().ambient_intensity() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn removing_unknown_light_is_an_error() {
        let mut state = new_state();
        let id = state.appearance().lights.last().unwrap().id();

        state.apply(ViewerCommand::RemoveLight(id)).unwrap();
        let version = state.version();

        assert!(matches!(
            state.apply(ViewerCommand::RemoveLight(id)),
            Err(ViewerError::Light(_))
        ));
        assert_eq!(version, state.version());

        // Removing the last light of an empty rig is a no-op.
        state.apply(ViewerCommand::RemoveLastLight).unwrap();
        assert_eq!(version, state.version());
    }

    #[test]
    fn surface_detaches_before_attaching() {
        let mut state = new_state();
        let mut surface = RecordingSurface::default();

        finish(&mut state, "cube.obj", CUBE_OBJ).unwrap();
        state.sync_surface(&mut surface).unwrap();

        // Nothing changed, nothing to do.
        state.sync_surface(&mut surface).unwrap();

        finish(&mut state, "triangle.obj", TRIANGLE_OBJ).unwrap();
        state.sync_surface(&mut surface).unwrap();

        assert_eq!(
            vec!["detach", "attach 12", "detach", "attach 1"],
            surface.events
        );
    }

    #[test]
    fn appearance_reaches_surface_without_a_model() {
        let mut state = new_state();
        let mut surface = RecordingSurface::default();

        state.sync_surface(&mut surface).unwrap();
        assert_eq!(Some("#121212"), surface.background.as_deref());

        state
            .apply(ViewerCommand::SetBackground(Color::from_rgb8(255, 255, 255)))
            .unwrap();
        state.sync_surface(&mut surface).unwrap();

        assert_eq!(Some("#ffffff"), surface.background.as_deref());
        assert_eq!(vec!["detach", "detach"], surface.events);
    }

    #[test]
    fn reset_camera_restores_home_pose() {
        let mut state = new_state();
        let home = state.camera().eye();

        state.mouse_scroll_wheel(0.0, 1.0);
        state.update_camera(Duration::from_millis(100));
        assert_ne!(home, state.camera().eye());

        let version = state.version();
        state.apply(ViewerCommand::ResetCamera).unwrap();
        assert_eq!(home, state.camera().eye());
        assert_eq!(version, state.version());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path: PathBuf =
            std::env::temp_dir().join(format!("meshview-viewer-{}.obj", std::process::id()));
        std::fs::write(&path, TRIANGLE_OBJ).unwrap();

        let mut state = new_state();
        let ticket = state.begin_load(&path).unwrap();
        let outcome = pollster::block_on(state.load(ticket));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(outcome, Ok(LoadOutcome::Loaded(_))));
    }
}
