//! # Property Panel
//!
//! Right-hand editor sidebar: spawn buttons that arm placement, text fields
//! for the selected object's properties, the autosave toggle and "save as".
//!
//! The panel is bound to at most one object at a time ([`PanelBinding`]).
//! Fields are rebuilt whenever the binding changes, so text typed for one
//! object never shows up on another.

use super::dev_ops::{format_hex_color, parse_hex_color, PropertyValues};
use super::input::KeyPress;
use super::layout::*;
use super::text_field::{FieldEvent, TextField};
use crate::gfx::scene::{ObjectId, PrimitiveKind, Scene, SceneObject};

pub const PANEL_WIDTH: f32 = 300.0;
pub const PANEL_PADDING: f32 = 12.0;
pub const PANEL_MARGIN: f32 = 10.0;
pub const BUTTON_HEIGHT: f32 = 32.0;
pub const INPUT_HEIGHT: f32 = 26.0;
pub const TOGGLE_SIZE: [f32; 2] = [40.0, 22.0];

/// Approximate advance of one glyph in the overlay font.
pub const GLYPH_WIDTH: f32 = 7.0;

pub const DEFAULT_SAVE_NAME: &str = "my_level";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    PosX,
    PosY,
    PosZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Color,
    Intensity,
    Alpha,
    Folder,
}

impl PropertyField {
    const POSITION: [PropertyField; 3] = [PropertyField::PosX, PropertyField::PosY, PropertyField::PosZ];
    const SCALE: [PropertyField; 3] = [
        PropertyField::ScaleX,
        PropertyField::ScaleY,
        PropertyField::ScaleZ,
    ];
}

/// Which object the fields currently describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelBinding {
    #[default]
    Unbound,
    Bound(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Save the scene under `<scenes dir>/<name>.json`.
    SaveAs(String),
    AutosaveToggled(bool),
    PlacementChanged(Option<PrimitiveKind>),
    /// A property field was committed; read [`PropertyPanel::property_values`].
    ApplyProperties,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Spawn(PrimitiveKind),
    SaveButton,
    AutosaveToggle,
    SaveAsInput,
    Field(PropertyField),
}

struct PanelLayout {
    widgets: Vec<Widget>,
    targets: Vec<(Rect, Target)>,
}

fn spawn_icon(kind: PrimitiveKind) -> Rgba {
    match kind {
        PrimitiveKind::Cube => [100, 100, 255, 255],
        PrimitiveKind::Triangle => [255, 100, 50, 255],
        PrimitiveKind::Light => [255, 230, 100, 255],
    }
}

fn spawn_label(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Light => "Point Light",
        other => other.label(),
    }
}

pub struct PropertyPanel {
    pub visible: bool,
    window: [f32; 2],
    placement: Option<PrimitiveKind>,
    binding: PanelBinding,
    object_name: String,
    fields: Vec<(PropertyField, TextField)>,
    save_as: TextField,
    scenes_label: String,
    autosave_enabled: bool,
    autosave_interval_secs: f32,
}

impl PropertyPanel {
    pub fn new(width: f32, height: f32, scenes_dir: &str, autosave_enabled: bool, autosave_interval_secs: f32) -> Self {
        Self {
            visible: false,
            window: [width, height],
            placement: None,
            binding: PanelBinding::Unbound,
            object_name: String::new(),
            fields: Vec::new(),
            save_as: TextField::new(DEFAULT_SAVE_NAME),
            scenes_label: format!("{}/", scenes_dir.trim_end_matches('/')),
            autosave_enabled,
            autosave_interval_secs,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.window = [width, height];
    }

    pub fn panel_rect(&self) -> Rect {
        Rect::new(
            self.window[0] - PANEL_WIDTH - PANEL_MARGIN,
            PANEL_MARGIN,
            PANEL_WIDTH,
            self.window[1] - 2.0 * PANEL_MARGIN,
        )
    }

    pub fn is_point_on_panel(&self, x: f32, y: f32) -> bool {
        self.visible && self.panel_rect().contains(x, y)
    }

    pub fn placement(&self) -> Option<PrimitiveKind> {
        self.placement
    }

    pub fn set_placement(&mut self, placement: Option<PrimitiveKind>) {
        self.placement = placement;
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave_enabled
    }

    pub fn save_as_text(&self) -> &str {
        self.save_as.text()
    }

    pub fn binding(&self) -> PanelBinding {
        self.binding
    }

    pub fn field(&self, field: PropertyField) -> Option<&TextField> {
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, text)| text)
    }

    fn field_mut(&mut self, field: PropertyField) -> Option<&mut TextField> {
        self.fields
            .iter_mut()
            .find(|(f, _)| *f == field)
            .map(|(_, text)| text)
    }

    /// Drops the binding and every field.
    pub fn unbind(&mut self) {
        self.binding = PanelBinding::Unbound;
        self.object_name.clear();
        self.fields.clear();
    }

    /// Rebuilds the fields from `object`.
    pub fn bind(&mut self, object: &SceneObject) {
        self.binding = PanelBinding::Bound(object.id());
        self.object_name = object.name.clone();
        self.fields.clear();

        let p = object.position();
        let s = object.scale();
        for (i, field) in PropertyField::POSITION.into_iter().enumerate() {
            self.fields.push((field, TextField::new(format!("{:.2}", p[i]))));
        }
        for (i, field) in PropertyField::SCALE.into_iter().enumerate() {
            self.fields.push((field, TextField::new(format!("{:.3}", s[i]))));
        }
        self.fields.push((
            PropertyField::Alpha,
            TextField::new(format!("{:.2}", object.alpha())),
        ));
        if !object.meshes().is_empty() {
            self.fields.push((
                PropertyField::Color,
                TextField::new(format_hex_color(object.color())),
            ));
        }
        if object.is_light() {
            self.fields.push((
                PropertyField::Intensity,
                TextField::new(format!("{:.2}", object.light_intensity())),
            ));
        }
        self.fields
            .push((PropertyField::Folder, TextField::new(object.folder())));
    }

    /// Keeps the binding in step with the selection.
    pub fn sync(&mut self, scene: &Scene, selected: Option<usize>) {
        match selected.and_then(|index| scene.get_object(index)) {
            Some(object) => {
                if self.binding != PanelBinding::Bound(object.id()) {
                    self.bind(object);
                }
            }
            None => {
                if self.binding != PanelBinding::Unbound {
                    self.unbind();
                }
            }
        }
    }

    /// Updates position and scale text from the object, skipping any field
    /// the user is typing into.
    pub fn refresh_values(&mut self, object: &SceneObject) {
        let p = object.position();
        let s = object.scale();
        for (i, field) in PropertyField::POSITION.into_iter().enumerate() {
            if let Some(text) = self.field_mut(field) {
                text.set_text(format!("{:.2}", p[i]));
            }
        }
        for (i, field) in PropertyField::SCALE.into_iter().enumerate() {
            if let Some(text) = self.field_mut(field) {
                text.set_text(format!("{:.3}", s[i]));
            }
        }
    }

    /// Rewrites every unfocused field from the object, so rejected input is
    /// replaced by the value actually in effect.
    pub fn refresh_all(&mut self, object: &SceneObject) {
        self.refresh_values(object);
        if let Some(text) = self.field_mut(PropertyField::Alpha) {
            text.set_text(format!("{:.2}", object.alpha()));
        }
        if let Some(text) = self.field_mut(PropertyField::Color) {
            text.set_text(format_hex_color(object.color()));
        }
        if let Some(text) = self.field_mut(PropertyField::Intensity) {
            text.set_text(format!("{:.2}", object.light_intensity()));
        }
        if let Some(text) = self.field_mut(PropertyField::Folder) {
            text.set_text(object.folder());
        }
    }

    /// Field text for the bound object, or `None` when unbound.
    pub fn property_values(&self) -> Option<PropertyValues> {
        if self.binding == PanelBinding::Unbound {
            return None;
        }
        let text = |field| self.field(field).map(|f| f.text().to_string());
        let folder = self
            .field(PropertyField::Folder)
            .filter(|f| !f.is_focused())
            .map(|f| f.text().to_string());

        Some(PropertyValues {
            position: PropertyField::POSITION.map(|f| text(f).unwrap_or_default()),
            scale: PropertyField::SCALE.map(|f| text(f).unwrap_or_default()),
            color: text(PropertyField::Color),
            intensity: text(PropertyField::Intensity),
            alpha: text(PropertyField::Alpha).unwrap_or_default(),
            folder,
        })
    }

    /// True while any text field owns the keyboard.
    pub fn has_focus(&self) -> bool {
        self.save_as.is_focused() || self.fields.iter().any(|(_, f)| f.is_focused())
    }

    /// Commits whichever field holds focus. Yields `ApplyProperties` when it
    /// was a property field.
    pub fn commit_focus(&mut self) -> Option<PanelAction> {
        self.save_as.commit();
        let mut committed = false;
        for (_, text) in &mut self.fields {
            if text.is_focused() {
                text.commit();
                committed = true;
            }
        }
        committed.then_some(PanelAction::ApplyProperties)
    }

    pub fn handle_key(&mut self, press: &KeyPress) -> Option<PanelAction> {
        if self.save_as.is_focused() {
            self.save_as.handle_key(press);
            return None;
        }
        let (_, field) = self.fields.iter_mut().find(|(_, f)| f.is_focused())?;
        match field.handle_key(press) {
            FieldEvent::Committed => Some(PanelAction::ApplyProperties),
            _ => None,
        }
    }

    /// Handles a left click at `(x, y)`. The click must already be known to
    /// be on the panel.
    pub fn handle_click(&mut self, x: f32, y: f32) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        if !self.visible {
            return actions;
        }

        let hit = self
            .layout()
            .targets
            .into_iter()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, target)| target);

        // Focus follows the click; a field losing focus commits.
        let mut committed = false;
        for (field, text) in &mut self.fields {
            if hit == Some(Target::Field(*field)) {
                text.focus();
            } else if text.is_focused() {
                text.commit();
                committed = true;
            }
        }
        if hit == Some(Target::SaveAsInput) {
            self.save_as.focus();
        } else {
            self.save_as.commit();
        }
        if committed {
            actions.push(PanelAction::ApplyProperties);
        }

        match hit {
            Some(Target::Spawn(kind)) => {
                self.placement = if self.placement == Some(kind) {
                    None
                } else {
                    Some(kind)
                };
                actions.push(PanelAction::PlacementChanged(self.placement));
            }
            Some(Target::SaveButton) => {
                actions.push(PanelAction::SaveAs(self.save_as.text().trim().to_string()));
            }
            Some(Target::AutosaveToggle) => {
                self.autosave_enabled = !self.autosave_enabled;
                actions.push(PanelAction::AutosaveToggled(self.autosave_enabled));
            }
            _ => {}
        }
        actions
    }

    pub fn widgets(&self) -> Vec<Widget> {
        if !self.visible {
            return Vec::new();
        }
        self.layout().widgets
    }

    fn layout(&self) -> PanelLayout {
        let mut widgets = Vec::new();
        let mut targets = Vec::new();

        let panel = self.panel_rect();
        widgets.push(Widget::Panel {
            rect: panel,
            clip: false,
        });

        let bx = panel.x + PANEL_PADDING;
        let bw = PANEL_WIDTH - 2.0 * PANEL_PADDING;
        let mut y = panel.y + PANEL_PADDING;

        let text = |widgets: &mut Vec<Widget>, x: f32, y: f32, s: &str, color: Rgba| {
            widgets.push(Widget::Text {
                pos: [x, y],
                text: s.to_string(),
                color,
            });
        };

        text(&mut widgets, bx, y, "EDITOR", SECTION_COLOR);
        y += 28.0;

        text(&mut widgets, bx, y, "-- Spawn (click to place) --", HEADING_COLOR);
        y += 22.0;

        for kind in PrimitiveKind::ALL {
            let rect = Rect::new(bx, y, bw, BUTTON_HEIGHT);
            widgets.push(Widget::Button {
                rect,
                label: spawn_label(kind).to_string(),
                icon: Some(spawn_icon(kind)),
                active: self.placement == Some(kind),
            });
            targets.push((rect, Target::Spawn(kind)));
            y += BUTTON_HEIGHT + 6.0;
        }

        if let Some(kind) = self.placement {
            let hint = format!("Click viewport to place {}", kind.name_prefix());
            text(&mut widgets, bx, y, &hint, [0, 255, 120, 255]);
            y += 18.0;
        }
        y += 6.0;

        if self.binding != PanelBinding::Unbound {
            let heading = format!("-- {} --", self.object_name);
            text(&mut widgets, bx, y, &heading, HEADING_COLOR);
            y += 24.0;
            y = self.layout_properties(&mut widgets, &mut targets, bx, bw, y);
            y += 6.0;
        } else {
            text(&mut widgets, bx, y, "Select object to edit", HINT_COLOR);
            y += 20.0;
        }

        y += 4.0;
        text(&mut widgets, bx, y, "-- Settings --", HEADING_COLOR);
        y += 24.0;

        let autosave_label = format!("Autosave ({:.0}s)", self.autosave_interval_secs);
        text(&mut widgets, bx, y + 2.0, &autosave_label, LABEL_COLOR);
        let toggle = Rect::new(bx + bw - 44.0, y, TOGGLE_SIZE[0], TOGGLE_SIZE[1]);
        widgets.push(Widget::Toggle {
            rect: toggle,
            on: self.autosave_enabled,
        });
        targets.push((toggle, Target::AutosaveToggle));
        y += 30.0;

        text(&mut widgets, bx, y, "-- Save As --", HEADING_COLOR);
        y += 22.0;

        let prefix_w = self.scenes_label.chars().count() as f32 * GLYPH_WIDTH;
        text(&mut widgets, bx, y + 4.0, &self.scenes_label, HINT_COLOR);
        let input_w = bw - prefix_w - 60.0;
        let input = Rect::new(bx + prefix_w + 4.0, y, input_w, INPUT_HEIGHT);
        widgets.push(Widget::Input {
            rect: input,
            text: self.save_as.text().to_string(),
            focused: self.save_as.is_focused(),
        });
        targets.push((input, Target::SaveAsInput));
        text(&mut widgets, bx + prefix_w + input_w + 6.0, y + 4.0, ".json", HINT_COLOR);

        let save = Rect::new(bx + bw - 50.0, y + INPUT_HEIGHT + 6.0, 50.0, INPUT_HEIGHT);
        widgets.push(Widget::Button {
            rect: save,
            label: "Save".to_string(),
            icon: None,
            active: false,
        });
        targets.push((save, Target::SaveButton));

        PanelLayout { widgets, targets }
    }

    fn layout_properties(
        &self,
        widgets: &mut Vec<Widget>,
        targets: &mut Vec<(Rect, Target)>,
        bx: f32,
        bw: f32,
        mut y: f32,
    ) -> f32 {
        let field_w = bw - 10.0;
        let single_w = (field_w / 3.0).floor() - 12.0;

        let mut input = |widgets: &mut Vec<Widget>, field: PropertyField, rect: Rect| {
            if let Some(text) = self.field(field) {
                widgets.push(Widget::Input {
                    rect,
                    text: text.text().to_string(),
                    focused: text.is_focused(),
                });
                targets.push((rect, Target::Field(field)));
            }
        };

        for (title, row) in [("Position", PropertyField::POSITION), ("Scale", PropertyField::SCALE)] {
            widgets.push(Widget::Text {
                pos: [bx, y],
                text: title.to_string(),
                color: LABEL_COLOR,
            });
            y += 18.0;

            let mut x = bx;
            for (axis, (field, label)) in row.into_iter().zip(["X", "Y", "Z"]).enumerate() {
                widgets.push(Widget::Text {
                    pos: [x, y + 3.0],
                    text: label.to_string(),
                    color: AXIS_COLORS[axis],
                });
                input(widgets, field, Rect::new(x + 16.0, y, single_w, INPUT_HEIGHT));
                x += single_w + 24.0;
            }
            y += INPUT_HEIGHT + 10.0;
        }

        let full_w = bw - 10.0;
        let rows = [
            (PropertyField::Color, "Color (hex)", LABEL_COLOR, bw - 50.0),
            (PropertyField::Intensity, "Intensity", [255, 230, 100, 255], full_w),
            (PropertyField::Alpha, "Opacity (0-1)", LABEL_COLOR, full_w),
            (PropertyField::Folder, "Folder", FOLDER_COLOR, full_w),
        ];
        for (field, label, color, width) in rows {
            let Some(text) = self.field(field) else {
                continue;
            };
            widgets.push(Widget::Text {
                pos: [bx, y],
                text: label.to_string(),
                color,
            });
            y += 18.0;

            let rect = Rect::new(bx, y, width, INPUT_HEIGHT);
            input(widgets, field, rect);
            if field == PropertyField::Color {
                if let Some(swatch) = parse_hex_color(text.text()) {
                    widgets.push(Widget::Swatch {
                        rect: Rect::new(bx + width + 6.0, y, 30.0, INPUT_HEIGHT),
                        color: rgba_from_unit(swatch),
                    });
                }
            }
            y += INPUT_HEIGHT + 10.0;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::input::Key;
    use cgmath::Vector3;

    fn panel() -> PropertyPanel {
        let mut panel = PropertyPanel::new(1280.0, 720.0, "scenes", false, 30.0);
        panel.visible = true;
        panel
    }

    fn target_rect(panel: &PropertyPanel, wanted: Target) -> Rect {
        panel
            .layout()
            .targets
            .into_iter()
            .find(|(_, target)| *target == wanted)
            .map(|(rect, _)| rect)
            .unwrap()
    }

    fn click(panel: &mut PropertyPanel, target: Target) -> Vec<PanelAction> {
        let rect = target_rect(panel, target);
        panel.handle_click(rect.x + 1.0, rect.y + 1.0)
    }

    fn scene_with_cube() -> (Scene, usize) {
        let mut scene = Scene::new();
        let mut cube = crate::gfx::scene::SceneObject::primitive("cube_1", PrimitiveKind::Cube, None);
        cube.set_position(Vector3::new(1.0, 0.5, -2.0));
        let index = scene.push_object(cube);
        (scene, index)
    }

    #[test]
    fn test_panel_rect_hugs_right_edge() {
        let panel = panel();
        assert_eq!(panel.panel_rect(), Rect::new(970.0, 10.0, 300.0, 700.0));
        assert!(panel.is_point_on_panel(1000.0, 300.0));
        assert!(!panel.is_point_on_panel(500.0, 300.0));
    }

    #[test]
    fn test_spawn_button_toggles_placement() {
        let mut panel = panel();
        let actions = click(&mut panel, Target::Spawn(PrimitiveKind::Light));
        assert_eq!(actions, vec![PanelAction::PlacementChanged(Some(PrimitiveKind::Light))]);

        let actions = click(&mut panel, Target::Spawn(PrimitiveKind::Light));
        assert_eq!(actions, vec![PanelAction::PlacementChanged(None)]);
        assert_eq!(panel.placement(), None);
    }

    #[test]
    fn test_save_and_autosave_actions() {
        let mut panel = panel();
        assert_eq!(
            click(&mut panel, Target::SaveButton),
            vec![PanelAction::SaveAs(DEFAULT_SAVE_NAME.to_string())]
        );
        assert_eq!(
            click(&mut panel, Target::AutosaveToggle),
            vec![PanelAction::AutosaveToggled(true)]
        );
        assert!(panel.autosave_enabled());
    }

    #[test]
    fn test_bind_formats_fields() {
        let (scene, index) = scene_with_cube();
        let mut panel = panel();
        panel.sync(&scene, Some(index));

        assert_eq!(panel.binding(), PanelBinding::Bound(scene.objects()[index].id()));
        assert_eq!(panel.field(PropertyField::PosX).unwrap().text(), "1.00");
        assert_eq!(panel.field(PropertyField::ScaleY).unwrap().text(), "1.000");
        assert_eq!(panel.field(PropertyField::Color).unwrap().text(), "#7C7AFF");
        assert_eq!(panel.field(PropertyField::Folder).unwrap().text(), "Scene");
        assert!(panel.field(PropertyField::Intensity).is_none());

        panel.sync(&scene, None);
        assert_eq!(panel.binding(), PanelBinding::Unbound);
        assert!(panel.property_values().is_none());
    }

    #[test]
    fn test_click_elsewhere_commits_field() {
        let (scene, index) = scene_with_cube();
        let mut panel = panel();
        panel.sync(&scene, Some(index));

        assert!(click(&mut panel, Target::Field(PropertyField::PosY)).is_empty());
        assert!(panel.has_focus());
        panel.handle_key(&KeyPress::with_text(Key::Other, '5'));

        let actions = click(&mut panel, Target::AutosaveToggle);
        assert_eq!(actions[0], PanelAction::ApplyProperties);
        assert!(!panel.has_focus());
        assert_eq!(panel.property_values().unwrap().position[1], "0.505");
    }

    #[test]
    fn test_commit_focus_applies_typed_value() {
        let (scene, index) = scene_with_cube();
        let mut panel = panel();
        panel.sync(&scene, Some(index));

        click(&mut panel, Target::Field(PropertyField::PosY));
        panel.handle_key(&KeyPress::with_text(Key::Other, '5'));

        assert_eq!(panel.commit_focus(), Some(PanelAction::ApplyProperties));
        assert!(!panel.has_focus());
        assert_eq!(panel.property_values().unwrap().position[1], "0.505");
        assert_eq!(panel.commit_focus(), None);
    }

    #[test]
    fn test_enter_commits_and_folder_hidden_while_typing() {
        let (scene, index) = scene_with_cube();
        let mut panel = panel();
        panel.sync(&scene, Some(index));

        click(&mut panel, Target::Field(PropertyField::Folder));
        panel.handle_key(&KeyPress::new(Key::Backspace));
        assert_eq!(panel.property_values().unwrap().folder, None);

        assert_eq!(
            panel.handle_key(&KeyPress::new(Key::Enter)),
            Some(PanelAction::ApplyProperties)
        );
        assert_eq!(panel.property_values().unwrap().folder.as_deref(), Some("Scen"));
    }

    #[test]
    fn test_refresh_skips_focused_field() {
        let (mut scene, index) = scene_with_cube();
        let mut panel = panel();
        panel.sync(&scene, Some(index));
        click(&mut panel, Target::Field(PropertyField::PosX));

        scene
            .get_object_mut(index)
            .unwrap()
            .set_position(Vector3::new(3.0, 4.0, 5.0));
        panel.refresh_values(&scene.objects()[index]);

        assert_eq!(panel.field(PropertyField::PosX).unwrap().text(), "1.00");
        assert_eq!(panel.field(PropertyField::PosY).unwrap().text(), "4.00");
    }

    #[test]
    fn test_rebinds_on_different_object() {
        let (mut scene, first) = scene_with_cube();
        let second = scene.push_object(crate::gfx::scene::SceneObject::light(
            "light_1",
            Vector3::new(1.0, 1.0, 1.0),
            2.0,
        ));
        let mut panel = panel();
        panel.sync(&scene, Some(first));
        panel.sync(&scene, Some(second));

        assert_eq!(panel.field(PropertyField::Intensity).unwrap().text(), "2.00");
        assert_eq!(panel.field(PropertyField::Color).unwrap().text(), "#FFFFFF");
    }
}
