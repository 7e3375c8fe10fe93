//! # Scene Hierarchy
//!
//! Left-hand panel listing objects grouped by folder. Folder rows toggle
//! open/closed and carry export and delete buttons; object rows select.

use super::input::KeyPress;
use super::layout::*;
use super::property_panel::GLYPH_WIDTH;
use super::text_field::{FieldEvent, TextField};
use crate::gfx::scene::{ObjectFormat, Scene, DEFAULT_FOLDER};

pub const PANEL_WIDTH: f32 = 260.0;
pub const PANEL_PADDING: f32 = 10.0;
pub const PANEL_MARGIN: f32 = 10.0;
pub const ROW_HEIGHT: f32 = 24.0;
pub const FOLDER_ROW_HEIGHT: f32 = 28.0;
pub const ICON_SIZE: f32 = 14.0;
pub const INDENT: f32 = 20.0;

const TITLE_HEIGHT: f32 = 26.0;
const FOLDER_GAP: f32 = 2.0;
const ADD_BUTTON_HEIGHT: f32 = 26.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyAction {
    Select(usize),
    /// Export the folder's objects to OBJ.
    Export(String),
    FolderDeleted(String),
    FolderCreated(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    AddFolder,
    Export(String),
    Delete(String),
    Folder(String),
    Object(usize),
}

struct HierarchyLayout {
    widgets: Vec<Widget>,
    /// Buttons are tested before rows since they sit on top of folder rows.
    buttons: Vec<(Rect, Target)>,
    rows: Vec<(Rect, Target)>,
    content_height: f32,
}

fn object_icon(format: ObjectFormat) -> Rgba {
    match format {
        ObjectFormat::Light => [255, 230, 100, 255],
        ObjectFormat::Cube => [100, 100, 255, 255],
        ObjectFormat::Triangle => [255, 100, 50, 255],
        _ => [150, 150, 150, 255],
    }
}

#[derive(Debug, Default)]
pub struct SceneHierarchy {
    pub visible: bool,
    window: [f32; 2],
    scroll_y: f32,
    new_folder: Option<TextField>,
}

impl SceneHierarchy {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            window: [width, height],
            ..Default::default()
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.window = [width, height];
    }

    pub fn panel_rect(&self) -> Rect {
        Rect::new(
            PANEL_MARGIN,
            PANEL_MARGIN,
            PANEL_WIDTH,
            self.window[1] - 2.0 * PANEL_MARGIN,
        )
    }

    pub fn is_point_on_panel(&self, x: f32, y: f32) -> bool {
        self.visible && self.panel_rect().contains(x, y)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll_y
    }

    /// True while the new-folder name is being typed.
    pub fn has_focus(&self) -> bool {
        self.new_folder.is_some()
    }

    pub fn handle_key(&mut self, press: &KeyPress, scene: &mut Scene) -> Option<HierarchyAction> {
        let field = self.new_folder.as_mut()?;
        match field.handle_key(press) {
            FieldEvent::Committed => {
                let name = field.text().trim().to_string();
                self.new_folder = None;
                if !name.is_empty() && scene.ensure_folder(&name) {
                    log::info!("Created folder '{}'", name);
                    return Some(HierarchyAction::FolderCreated(name));
                }
                None
            }
            FieldEvent::Cancelled => {
                self.new_folder = None;
                None
            }
            _ => None,
        }
    }

    /// Scrolls one row per wheel notch; positive `lines` scrolls up.
    pub fn handle_wheel(&mut self, lines: f32, scene: &Scene) {
        if !self.visible || lines == 0.0 {
            return;
        }
        let max_scroll = self.max_scroll(scene);
        let step = if lines > 0.0 { -ROW_HEIGHT } else { ROW_HEIGHT };
        self.scroll_y = (self.scroll_y + step).clamp(0.0, max_scroll);
    }

    pub fn max_scroll(&self, scene: &Scene) -> f32 {
        let content = self.layout(scene, None).content_height;
        (content - self.panel_rect().h + 20.0).max(0.0)
    }

    /// Handles a left click. Folder toggles, deletes and creation are applied
    /// to `scene` directly; selection and export are returned to the caller.
    pub fn handle_click(&mut self, x: f32, y: f32, scene: &mut Scene) -> Option<HierarchyAction> {
        if !self.is_point_on_panel(x, y) {
            return None;
        }
        let layout = self.layout(scene, None);
        let hit = layout
            .buttons
            .into_iter()
            .chain(layout.rows)
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, target)| target)?;

        match hit {
            Target::AddFolder => {
                let mut field = TextField::default();
                field.focus();
                self.new_folder = Some(field);
                None
            }
            Target::Export(folder) => Some(HierarchyAction::Export(folder)),
            Target::Delete(folder) => {
                if scene.delete_folder(&folder) {
                    log::info!("Deleted folder '{}', objects moved to '{}'", folder, DEFAULT_FOLDER);
                    self.clamp_scroll(scene);
                    Some(HierarchyAction::FolderDeleted(folder))
                } else {
                    None
                }
            }
            Target::Folder(folder) => {
                scene.toggle_folder(&folder);
                self.clamp_scroll(scene);
                None
            }
            Target::Object(index) => Some(HierarchyAction::Select(index)),
        }
    }

    fn clamp_scroll(&mut self, scene: &Scene) {
        self.scroll_y = self.scroll_y.min(self.max_scroll(scene));
    }

    pub fn widgets(&self, scene: &Scene, selected: Option<usize>) -> Vec<Widget> {
        if !self.visible {
            return Vec::new();
        }
        self.layout(scene, selected).widgets
    }

    fn layout(&self, scene: &Scene, selected: Option<usize>) -> HierarchyLayout {
        let panel = self.panel_rect();
        let mut widgets = vec![Widget::Panel {
            rect: panel,
            clip: true,
        }];
        let mut buttons = Vec::new();
        let mut rows = Vec::new();

        let bx = panel.x + PANEL_PADDING;
        let bw = PANEL_WIDTH - 2.0 * PANEL_PADDING;
        let mut y = panel.y + PANEL_PADDING - self.scroll_y;

        widgets.push(Widget::Text {
            pos: [bx, y],
            text: "HIERARCHY".to_string(),
            color: SECTION_COLOR,
        });
        y += TITLE_HEIGHT;

        for (folder, state) in scene.folders().sorted() {
            let members: Vec<usize> = scene.objects_in_folder(folder).collect();

            let row = Rect::new(bx, y, bw, FOLDER_ROW_HEIGHT);
            widgets.push(Widget::Text {
                pos: [bx + 4.0, y + 5.0],
                text: if state.open { "v" } else { ">" }.to_string(),
                color: FOLDER_COLOR,
            });
            widgets.push(Widget::Text {
                pos: [bx + 20.0, y + 5.0],
                text: folder.to_string(),
                color: FOLDER_COLOR,
            });
            widgets.push(Widget::Text {
                pos: [bx + 22.0 + folder.chars().count() as f32 * GLYPH_WIDTH, y + 6.0],
                text: format!("({})", members.len()),
                color: [100, 100, 120, 255],
            });
            rows.push((row, Target::Folder(folder.to_string())));

            let export = Rect::new(bx + bw - 44.0, y + 3.0, 20.0, 20.0);
            widgets.push(Widget::Icon {
                rect: export,
                glyph: '^',
                color: [60, 140, 80, 255],
            });
            buttons.push((export, Target::Export(folder.to_string())));

            if folder != DEFAULT_FOLDER {
                let delete = Rect::new(bx + bw - 22.0, y + 3.0, 20.0, 20.0);
                widgets.push(Widget::Icon {
                    rect: delete,
                    glyph: 'x',
                    color: [140, 60, 60, 255],
                });
                buttons.push((delete, Target::Delete(folder.to_string())));
            }
            y += FOLDER_ROW_HEIGHT;

            if state.open {
                for index in members {
                    let object = &scene.objects()[index];
                    let row = Rect::new(bx + INDENT, y, bw - INDENT, ROW_HEIGHT);
                    let is_selected = selected == Some(index);
                    if is_selected {
                        widgets.push(Widget::Fill {
                            rect: row,
                            color: SELECTED_BG,
                        });
                    }

                    let icon_x = bx + INDENT + 4.0;
                    widgets.push(Widget::Swatch {
                        rect: Rect::new(icon_x, y + (ROW_HEIGHT - ICON_SIZE) / 2.0, ICON_SIZE, ICON_SIZE),
                        color: object_icon(object.format()),
                    });
                    widgets.push(Widget::Text {
                        pos: [icon_x + ICON_SIZE + 6.0, y + 4.0],
                        text: object.name.clone(),
                        color: if is_selected { ITEM_SELECTED } else { ITEM_COLOR },
                    });
                    rows.push((row, Target::Object(index)));
                    y += ROW_HEIGHT;
                }
            }
            y += FOLDER_GAP;
        }

        y += 4.0;
        let add = Rect::new(bx, y, bw, ADD_BUTTON_HEIGHT);
        widgets.push(Widget::Button {
            rect: add,
            label: "+ New Folder".to_string(),
            icon: None,
            active: false,
        });
        buttons.push((add, Target::AddFolder));
        y += 34.0;

        if let Some(field) = &self.new_folder {
            widgets.push(Widget::Input {
                rect: Rect::new(bx, y, bw, ADD_BUTTON_HEIGHT),
                text: field.text().to_string(),
                focused: true,
            });
            widgets.push(Widget::Text {
                pos: [bx, y + 30.0],
                text: "Enter to create, Esc to cancel".to_string(),
                color: [100, 100, 120, 255],
            });
            y += 60.0;
        }

        HierarchyLayout {
            widgets,
            buttons,
            rows,
            content_height: y + self.scroll_y - panel.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::input::Key;
    use crate::gfx::scene::{PrimitiveKind, SceneObject};

    fn hierarchy() -> SceneHierarchy {
        let mut hierarchy = SceneHierarchy::new(1280.0, 720.0);
        hierarchy.visible = true;
        hierarchy
    }

    fn cube(name: &str) -> SceneObject {
        SceneObject::primitive(name, PrimitiveKind::Cube, None)
    }

    // Title at y = 20, first folder row at 46, its first object row at 74.
    const FIRST_FOLDER_Y: f32 = 46.0;
    const FIRST_OBJECT_Y: f32 = 74.0;

    #[test]
    fn test_click_object_row_selects() {
        let mut scene = Scene::new();
        scene.push_object(cube("cube_1"));
        scene.push_object(cube("cube_2"));
        let mut hierarchy = hierarchy();

        let action = hierarchy.handle_click(60.0, FIRST_OBJECT_Y + ROW_HEIGHT + 5.0, &mut scene);
        assert_eq!(action, Some(HierarchyAction::Select(1)));
    }

    #[test]
    fn test_folder_row_toggles_and_hides_children() {
        let mut scene = Scene::new();
        scene.push_object(cube("cube_1"));
        let mut hierarchy = hierarchy();

        assert_eq!(hierarchy.handle_click(60.0, FIRST_FOLDER_Y + 5.0, &mut scene), None);
        assert!(!scene.folder_state(DEFAULT_FOLDER).unwrap().open);

        // The object row is gone; the click lands on nothing.
        assert_eq!(hierarchy.handle_click(60.0, FIRST_OBJECT_Y + 5.0, &mut scene), None);
    }

    #[test]
    fn test_export_and_delete_buttons() {
        let mut scene = Scene::new();
        scene.push_object(cube("cube_1").with_folder("Props"));
        let mut hierarchy = hierarchy();

        // "Scene" is empty: its row is 28 high plus a 2 px gap.
        let props_y = FIRST_FOLDER_Y + FOLDER_ROW_HEIGHT + FOLDER_GAP;
        let bx = PANEL_MARGIN + PANEL_PADDING;
        let bw = PANEL_WIDTH - 2.0 * PANEL_PADDING;

        assert_eq!(
            hierarchy.handle_click(bx + bw - 40.0, props_y + 5.0, &mut scene),
            Some(HierarchyAction::Export("Props".to_string()))
        );
        assert_eq!(
            hierarchy.handle_click(bx + bw - 18.0, props_y + 5.0, &mut scene),
            Some(HierarchyAction::FolderDeleted("Props".to_string()))
        );
        assert_eq!(scene.objects()[0].folder(), DEFAULT_FOLDER);

        // The default folder has no delete button; the click toggles the row.
        assert_eq!(
            hierarchy.handle_click(bx + bw - 18.0, FIRST_FOLDER_Y + 5.0, &mut scene),
            None
        );
        assert!(scene.folders().contains(DEFAULT_FOLDER));
    }

    #[test]
    fn test_new_folder_input() {
        let mut scene = Scene::new();
        let mut hierarchy = hierarchy();

        // Only "Scene" (empty): add button at 46 + 28 + 2 + 4 = 80.
        hierarchy.handle_click(60.0, 85.0, &mut scene);
        assert!(hierarchy.has_focus());

        for ch in " Lights ".chars() {
            hierarchy.handle_key(&KeyPress::with_text(Key::Other, ch), &mut scene);
        }
        let action = hierarchy.handle_key(&KeyPress::new(Key::Enter), &mut scene);
        assert_eq!(action, Some(HierarchyAction::FolderCreated("Lights".to_string())));
        assert!(!hierarchy.has_focus());
        assert!(scene.folders().contains("Lights"));

        hierarchy.handle_click(60.0, 85.0 + FOLDER_ROW_HEIGHT + FOLDER_GAP, &mut scene);
        hierarchy.handle_key(&KeyPress::with_text(Key::Other, 'x'), &mut scene);
        hierarchy.handle_key(&KeyPress::new(Key::Escape), &mut scene);
        assert!(!hierarchy.has_focus());
        assert!(!scene.folders().contains("x"));
    }

    #[test]
    fn test_wheel_scroll_is_clamped() {
        let mut scene = Scene::new();
        let mut hierarchy = hierarchy();
        hierarchy.handle_wheel(-1.0, &scene);
        assert_eq!(hierarchy.scroll(), 0.0);

        for i in 0..60 {
            scene.push_object(cube(&format!("cube_{}", i)));
        }
        let max = hierarchy.max_scroll(&scene);
        assert!(max > 0.0);

        hierarchy.handle_wheel(-1.0, &scene);
        assert_eq!(hierarchy.scroll(), ROW_HEIGHT);
        hierarchy.handle_wheel(1.0, &scene);
        hierarchy.handle_wheel(1.0, &scene);
        assert_eq!(hierarchy.scroll(), 0.0);

        for _ in 0..200 {
            hierarchy.handle_wheel(-1.0, &scene);
        }
        assert_eq!(hierarchy.scroll(), max);
    }
}
