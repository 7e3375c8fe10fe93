//! # Editor Session
//!
//! Owns the scene and everything that edits it, and routes input between the
//! camera, the panels and the dev operations so that no two consumers act on
//! the same event.
//!
//! ## Modes
//!
//! - **fly-look**: pointer captured, mouse motion turns the camera.
//! - **cursor-edit**: pointer free; clicks go to panels, placement or picking.
//!
//! Edit mode (F1) shows the panels and always enters cursor-edit. A focused
//! text field takes every key press before any shortcut sees it.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use super::dev_ops::{log_scene_info, stretch_axis, Axis, DevTools};
use super::hierarchy::{HierarchyAction, SceneHierarchy};
use super::input::{HeldKeys, InputEvent, Key, KeyPress, MouseButton};
use super::layout::Widget;
use super::property_panel::{PanelAction, PropertyPanel};
use crate::config::EditorConfig;
use crate::gfx::camera::{CameraUniform, FlyCamera};
use crate::gfx::picking::{pick_object, pick_object_from_screen, screen_to_floor};
use crate::gfx::rendering::{collect_lights, PointLight, Scenery};
use crate::gfx::scene::{Mesh, PrimitiveKind, Scene, SceneObject};
use crate::gfx::viewport::Viewport;
use crate::persistence::{export_folder, save_scene, SceneFileError};

/// Soft timer that asks for a save every `interval` seconds while enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autosave {
    pub enabled: bool,
    pub interval: f32,
    timer: f32,
}

impl Autosave {
    pub fn new(enabled: bool, interval: f32) -> Self {
        Self {
            enabled,
            interval: interval.max(0.1),
            timer: 0.0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.timer = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    /// Advances the timer; true when a save is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Read-only view of the session for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    pub edit_mode: bool,
    pub cursor_mode: bool,
    pub show_help: bool,
    pub placement: Option<PrimitiveKind>,
    pub selected_name: Option<String>,
    pub selected_position: Vector3<f32>,
    pub selected_scale: Vector3<f32>,
    pub stretch_axis: Option<Axis>,
}

pub struct EditorSession {
    scene: Scene,
    camera: FlyCamera,
    scenery: Scenery,
    tools: DevTools,
    panel: PropertyPanel,
    hierarchy: SceneHierarchy,
    held: HeldKeys,
    viewport: Viewport,
    cursor: [f32; 2],
    edit_mode: bool,
    cursor_mode: bool,
    show_help: bool,
    selected: Option<usize>,
    scene_file: PathBuf,
    scenes_dir: PathBuf,
    export_dir: PathBuf,
    autosave: Autosave,
    saved_this_tick: bool,
    quit_requested: bool,
}

impl EditorSession {
    pub fn new(config: &EditorConfig, scene: Scene, scene_file: PathBuf, width: f32, height: f32) -> Self {
        let settings = &config.editor;
        let scenes_dir = config.paths.scenes_dir.clone();
        let mut camera = config.camera.build();
        let viewport = Viewport::new(width, height);
        camera.update_view_proj(viewport.aspect());

        Self {
            scene,
            camera,
            scenery: Scenery::new(),
            tools: DevTools::new(settings.move_speed, settings.scale_speed),
            panel: PropertyPanel::new(
                viewport.width,
                viewport.height,
                &scenes_dir.to_string_lossy(),
                settings.autosave_enabled,
                settings.autosave_interval_secs,
            ),
            hierarchy: SceneHierarchy::new(viewport.width, viewport.height),
            held: HeldKeys::default(),
            viewport,
            cursor: [viewport.width * 0.5, viewport.height * 0.5],
            edit_mode: false,
            cursor_mode: false,
            show_help: false,
            selected: None,
            scene_file,
            scenes_dir,
            export_dir: config.paths.export_dir.clone(),
            autosave: Autosave::new(settings.autosave_enabled, settings.autosave_interval_secs),
            saved_this_tick: false,
            quit_requested: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn cursor_mode(&self) -> bool {
        self.cursor_mode
    }

    pub fn placement(&self) -> Option<PrimitiveKind> {
        self.panel.placement()
    }

    pub fn scene_file(&self) -> &Path {
        &self.scene_file
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Last known pointer position in window pixels.
    pub fn cursor(&self) -> [f32; 2] {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn panel(&self) -> &PropertyPanel {
        &self.panel
    }

    pub fn hierarchy(&self) -> &SceneHierarchy {
        &self.hierarchy
    }

    /// True while a panel text field owns the keyboard.
    pub fn has_text_focus(&self) -> bool {
        self.panel.has_focus() || self.hierarchy.has_focus()
    }

    /// Object drawn with the wireframe highlight.
    pub fn highlighted(&self) -> Option<usize> {
        self.selected.filter(|_| self.edit_mode)
    }

    pub fn hud_state(&self) -> HudState {
        let selected = self.selected.and_then(|index| self.scene.get_object(index));
        HudState {
            edit_mode: self.edit_mode,
            cursor_mode: self.cursor_mode,
            show_help: self.show_help,
            placement: self.panel.placement(),
            selected_name: selected.map(|object| object.name.clone()),
            selected_position: selected.map_or(Vector3::new(0.0, 0.0, 0.0), SceneObject::position),
            selected_scale: selected.map_or(Vector3::new(1.0, 1.0, 1.0), SceneObject::scale),
            stretch_axis: stretch_axis(&self.held),
        }
    }

    /// Panel widgets to draw this frame, hierarchy first.
    pub fn panel_widgets(&self) -> Vec<Widget> {
        if !self.edit_mode {
            return Vec::new();
        }
        let mut widgets = self.hierarchy.widgets(&self.scene, self.selected);
        widgets.extend(self.panel.widgets());
        widgets
    }

    /// Everything the renderer needs for one frame.
    pub fn render_data(&mut self) -> (&mut Scene, &mut [Mesh], CameraUniform, Vec<PointLight>) {
        let lights = collect_lights(&self.scene, &self.scenery.orbit);
        (
            &mut self.scene,
            self.scenery.meshes_mut(),
            self.camera.uniform,
            lights,
        )
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(press) => self.handle_key(press),
            InputEvent::KeyUp(key) => self.held.release(key),
            InputEvent::MouseMotion { dx, dy } => {
                if !self.cursor_mode {
                    self.camera.process_mouse(dx, dy);
                }
            }
            InputEvent::CursorMoved { x, y } => self.cursor = [x, y],
            InputEvent::MouseDown(MouseButton::Left) => self.handle_click(),
            InputEvent::MouseDown(_) => {}
            InputEvent::Wheel { lines } => {
                let [x, y] = self.cursor;
                if self.cursor_mode && self.edit_mode && self.hierarchy.is_point_on_panel(x, y) {
                    self.hierarchy.handle_wheel(lines, &self.scene);
                }
            }
            InputEvent::Resized { width, height } => self.resize(width as f32, height as f32),
            InputEvent::FocusLost => self.held.clear(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.panel.resize(self.viewport.width, self.viewport.height);
        self.hierarchy.resize(self.viewport.width, self.viewport.height);
        self.camera.update_view_proj(self.viewport.aspect());
    }

    fn handle_key(&mut self, press: KeyPress) {
        if self.panel.has_focus() {
            if let Some(action) = self.panel.handle_key(&press) {
                self.apply_panel_action(action);
            }
            return;
        }
        if self.hierarchy.has_focus() {
            self.hierarchy.handle_key(&press, &mut self.scene);
            return;
        }

        // Ctrl chords are shortcuts, not movement.
        if !press.ctrl {
            self.held.press(press.key);
        }
        self.handle_shortcut(press);
    }

    fn handle_shortcut(&mut self, press: KeyPress) {
        match press.key {
            Key::Escape => {
                if !self.cursor_mode {
                    log::info!("Quit requested");
                    self.quit_requested = true;
                } else if self.panel.placement().is_some() {
                    self.panel.set_placement(None);
                    log::info!("Placement cancelled");
                } else {
                    self.set_cursor_mode(false);
                }
            }
            Key::F1 => self.set_edit_mode(!self.edit_mode),
            Key::F2 => self.set_cursor_mode(!self.cursor_mode),
            Key::F3 if self.edit_mode => self.hierarchy.toggle(),
            Key::H => self.show_help = !self.show_help,
            Key::Tab if self.edit_mode => {
                log_scene_info(&self.scene_file, &self.scene, self.selected);
                self.report_save();
            }
            Key::S if press.ctrl && self.edit_mode => self.report_save(),
            Key::C if self.edit_mode && !self.cursor_mode => {
                let index = self
                    .tools
                    .spawn_in_front(PrimitiveKind::Cube, &self.camera, &mut self.scene);
                self.select(Some(index));
            }
            Key::Delete if self.edit_mode => self.delete_selected(),
            _ => {}
        }
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
        self.panel.visible = on;
        self.set_cursor_mode(on);
        log::info!("Edit mode {}", if on { "ON" } else { "OFF" });
    }

    pub fn set_cursor_mode(&mut self, on: bool) {
        self.cursor_mode = on;
        if !on {
            self.panel.set_placement(None);
        }
    }

    fn select(&mut self, index: Option<usize>) {
        let index = index.filter(|i| *i < self.scene.len());
        if index == self.selected {
            return;
        }
        self.selected = index;
        self.panel.unbind();
        match index.and_then(|i| self.scene.get_object(i)) {
            Some(object) => log::info!("Selected '{}'", object.name),
            None => log::info!("Deselected"),
        }
    }

    pub fn delete_selected(&mut self) {
        if self.tools.delete(self.selected, &mut self.scene) {
            self.selected = None;
            self.panel.unbind();
        }
    }

    fn handle_click(&mut self) {
        let [x, y] = self.cursor;

        if !self.cursor_mode {
            if self.edit_mode {
                let hit = pick_object(&self.camera, &self.scene);
                self.pick(hit);
            }
            return;
        }

        if self.panel.is_point_on_panel(x, y) {
            for action in self.panel.handle_click(x, y) {
                self.apply_panel_action(action);
            }
            return;
        }

        if self.hierarchy.is_point_on_panel(x, y) && self.edit_mode {
            self.commit_panel_fields();
            if let Some(action) = self.hierarchy.handle_click(x, y, &mut self.scene) {
                self.apply_hierarchy_action(action);
            }
            return;
        }

        self.commit_panel_fields();

        if let Some(kind) = self.panel.placement() {
            let index = match screen_to_floor(&self.camera, self.viewport, x, y) {
                Some(point) => self.tools.spawn_at(kind, point, &mut self.scene),
                None => self.tools.spawn_in_front(kind, &self.camera, &mut self.scene),
            };
            self.panel.set_placement(None);
            self.select(Some(index));
        } else if self.edit_mode {
            let hit = pick_object_from_screen(&self.camera, self.viewport, x, y, &self.scene);
            self.pick(hit);
        }
    }

    fn pick(&mut self, hit: Option<usize>) {
        if hit.is_some() || self.selected.is_some() {
            self.select(hit);
        }
    }

    /// Commits any property field still being typed into.
    fn commit_panel_fields(&mut self) {
        if let Some(action) = self.panel.commit_focus() {
            self.apply_panel_action(action);
        }
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::SaveAs(name) => self.save_as(&name),
            PanelAction::AutosaveToggled(enabled) => {
                self.autosave.set_enabled(enabled);
                log::info!("Autosave {}", if enabled { "ON" } else { "OFF" });
            }
            PanelAction::PlacementChanged(Some(kind)) => {
                log::info!("Click the viewport to place a {}", kind.name_prefix());
            }
            PanelAction::PlacementChanged(None) => {}
            PanelAction::ApplyProperties => self.apply_properties(),
        }
    }

    fn apply_properties(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(values) = self.panel.property_values() else {
            return;
        };
        self.tools.apply_property_values(index, &values, &mut self.scene);
        if let Some(object) = self.scene.get_object(index) {
            self.panel.refresh_all(object);
        }
    }

    fn apply_hierarchy_action(&mut self, action: HierarchyAction) {
        match action {
            HierarchyAction::Select(index) => self.select(Some(index)),
            HierarchyAction::Export(folder) => {
                if let Err(err) = export_folder(&folder, &self.scene, &self.export_dir) {
                    log::error!("Export of '{}' failed: {}", folder, err);
                }
            }
            HierarchyAction::FolderDeleted(_) => {
                if let Some(object) = self.selected.and_then(|i| self.scene.get_object(i)) {
                    self.panel.refresh_all(object);
                }
            }
            HierarchyAction::FolderCreated(_) => {}
        }
    }

    /// Saves to the current scene file.
    pub fn save(&mut self) -> Result<(), SceneFileError> {
        self.saved_this_tick = true;
        save_scene(&self.scene_file, &self.scene)
    }

    fn report_save(&mut self) {
        if let Err(err) = self.save() {
            log::error!("Save failed: {}", err);
        }
    }

    /// Saves to `<scenes dir>/<name>.json` and makes that the current file.
    pub fn save_as(&mut self, name: &str) {
        let name = name.trim().trim_end_matches(".json");
        if name.is_empty() {
            log::warn!("Save as: empty file name");
            return;
        }
        let path = self.scenes_dir.join(format!("{}.json", name));
        self.saved_this_tick = true;
        match save_scene(&path, &self.scene) {
            Ok(()) => self.scene_file = path,
            Err(err) => log::error!("Save as failed: {}", err),
        }
    }

    /// Advances one frame: held-key edits, camera, animation and autosave.
    pub fn tick(&mut self, dt: f32) {
        if !self.has_text_focus() {
            self.camera.process_keyboard(dt, &self.held);
        }

        if self.edit_mode && !self.has_text_focus() {
            if let Some(index) = self.selected {
                if let Some(object) = self.scene.get_object_mut(index) {
                    if self.tools.apply_held_keys(dt, object, &self.held) {
                        self.panel.refresh_values(object);
                    }
                }
            }
        }

        self.panel.sync(&self.scene, self.selected);
        self.scene.update(dt);
        self.scenery.update(dt);
        self.camera.update_view_proj(self.viewport.aspect());

        if self.autosave.tick(dt) {
            if self.saved_this_tick {
                log::debug!("Autosave skipped: saved this frame");
            } else {
                log::info!("Autosave");
                self.report_save();
            }
        }
        self.saved_this_tick = false;
    }

    /// Releases GPU resources held by the scene and scenery.
    pub fn destroy(&mut self) {
        self.scene.clear();
        self.scenery.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::SceneObject;

    fn session_in(dir: &Path) -> EditorSession {
        let mut config = EditorConfig::default();
        config.paths.scenes_dir = dir.join("scenes");
        config.paths.export_dir = dir.join("exports");
        EditorSession::new(&config, Scene::new(), dir.join("scene.json"), 1280.0, 720.0)
    }

    fn key(session: &mut EditorSession, key: Key) {
        session.handle_event(InputEvent::KeyDown(KeyPress::new(key)));
        session.handle_event(InputEvent::KeyUp(key));
    }

    fn click_at(session: &mut EditorSession, x: f32, y: f32) {
        session.handle_event(InputEvent::CursorMoved { x, y });
        session.handle_event(InputEvent::MouseDown(MouseButton::Left));
    }

    #[test]
    fn test_edit_mode_enters_cursor_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        key(&mut session, Key::F1);
        assert!(session.edit_mode());
        assert!(session.cursor_mode());
        assert!(session.panel().visible);

        key(&mut session, Key::F1);
        assert!(!session.edit_mode());
        assert!(!session.cursor_mode());
    }

    #[test]
    fn test_escape_cancels_placement_then_cursor_then_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        key(&mut session, Key::F1);
        session.panel.set_placement(Some(PrimitiveKind::Cube));

        key(&mut session, Key::Escape);
        assert_eq!(session.placement(), None);
        assert!(session.cursor_mode());

        key(&mut session, Key::Escape);
        assert!(!session.cursor_mode());
        assert!(!session.quit_requested());

        key(&mut session, Key::Escape);
        assert!(session.quit_requested());
    }

    #[test]
    fn test_mouse_look_only_in_fly_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let yaw = session.camera().yaw();

        key(&mut session, Key::F2);
        session.handle_event(InputEvent::MouseMotion { dx: 50.0, dy: 0.0 });
        assert_eq!(session.camera().yaw(), yaw);

        key(&mut session, Key::F2);
        session.handle_event(InputEvent::MouseMotion { dx: 50.0, dy: 0.0 });
        assert_ne!(session.camera().yaw(), yaw);
    }

    #[test]
    fn test_ctrl_s_saves_without_moving_camera() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        key(&mut session, Key::F1);
        let before = session.camera().position;

        session.handle_event(InputEvent::KeyDown(KeyPress::with_ctrl(Key::S)));
        session.tick(0.5);

        assert_eq!(session.camera().position, before);
        assert!(session.scene_file().exists());
    }

    #[test]
    fn test_spawn_in_front_and_delete_clears_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        key(&mut session, Key::F1);
        key(&mut session, Key::F2);
        assert!(!session.cursor_mode());

        key(&mut session, Key::C);
        assert_eq!(session.scene().len(), 1);
        assert_eq!(session.selected(), Some(0));
        session.tick(0.016);
        assert!(session.panel().property_values().is_some());

        key(&mut session, Key::Delete);
        assert!(session.scene().is_empty());
        assert_eq!(session.selected(), None);
        assert!(session.panel().property_values().is_none());
        assert!(session.hud_state().selected_name.is_none());
    }

    #[test]
    fn test_placement_falls_back_to_in_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        key(&mut session, Key::F1);
        session.panel.set_placement(Some(PrimitiveKind::Light));

        // The default camera looks horizontally, so the centre ray never
        // reaches the floor.
        click_at(&mut session, 640.0, 360.0);

        assert_eq!(session.scene().len(), 1);
        let light = &session.scene().objects()[0];
        assert!(light.is_light());
        assert_eq!(light.name, "light_1");
        assert!((light.position().z - -2.0).abs() < 1e-4);
        assert_eq!(session.placement(), None);
        assert_eq!(session.selected(), Some(0));
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let mut cube = SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);
        cube.set_position(Vector3::new(0.0, 1.0, -100.0));
        session.scene.push_object(cube);
        key(&mut session, Key::F1);

        click_at(&mut session, 640.0, 360.0);
        assert_eq!(session.selected(), Some(0));

        // Straight up, far from the object's pick sphere.
        session.camera.set_orientation(-90.0, 89.0);
        session.camera.update_view_proj(session.viewport().aspect());
        click_at(&mut session, 640.0, 360.0);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_focused_field_swallows_shortcuts() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        key(&mut session, Key::F1);

        // Focus the save-as field: it sits at the bottom of the panel.
        let widgets = session.panel().widgets();
        let input = widgets
            .iter()
            .rev()
            .find_map(|widget| match widget {
                Widget::Input { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        click_at(&mut session, input.x + 2.0, input.y + 2.0);
        assert!(session.has_text_focus());

        session.handle_event(InputEvent::KeyDown(KeyPress::with_text(Key::H, 'h')));
        key(&mut session, Key::F1);
        assert!(session.edit_mode());
        assert!(!session.hud_state().show_help);
        assert_eq!(session.panel().save_as_text(), "my_levelh");

        key(&mut session, Key::Enter);
        assert!(!session.has_text_focus());
    }

    #[test]
    fn test_held_keys_move_selection_and_refresh_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session
            .scene
            .push_object(SceneObject::primitive("cube_1", PrimitiveKind::Cube, None));
        key(&mut session, Key::F1);
        session.select(Some(0));
        session.tick(0.0);

        session.handle_event(InputEvent::KeyDown(KeyPress::new(Key::ArrowRight)));
        session.tick(0.5);

        assert_eq!(session.scene().objects()[0].position().x, 1.0);
        let values = session.panel().property_values().unwrap();
        assert_eq!(values.position[0], "1.00");
    }

    #[test]
    fn test_save_as_switches_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.save_as("my_level");

        let expected = dir.path().join("scenes").join("my_level.json");
        assert!(expected.exists());
        assert_eq!(session.scene_file(), expected.as_path());
    }

    #[test]
    fn test_autosave_skips_frame_with_manual_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.autosave = Autosave::new(true, 1.0);

        session.save().unwrap();
        std::fs::remove_file(session.scene_file()).unwrap();
        session.tick(1.5);
        assert!(!session.scene_file().exists());
        assert_eq!(session.autosave().elapsed(), 0.0);

        session.tick(1.5);
        assert!(session.scene_file().exists());
    }

    #[test]
    fn test_autosave_timer() {
        let mut autosave = Autosave::new(false, 30.0);
        assert!(!autosave.tick(100.0));

        autosave.set_enabled(true);
        assert!(!autosave.tick(20.0));
        assert!(autosave.tick(10.0));
        assert_eq!(autosave.elapsed(), 0.0);
    }
}
