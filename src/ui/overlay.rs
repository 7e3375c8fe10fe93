//! HUD overlay: crosshair, status lines, the controls help panel and the
//! editor panels' widgets, all drawn straight onto ImGui's foreground list.

use imgui::{DrawListMut, ImColor32};

use crate::editor::{HudState, Rect, Rgba, Widget};

const TEXT_PRIMARY: Rgba = [0, 255, 100, 255];
const TEXT_SELECTED: Rgba = [255, 255, 100, 255];
const TEXT_DETAIL: Rgba = [200, 200, 200, 220];
const TEXT_DIM: Rgba = [140, 140, 140, 160];
const HELP_BG: Rgba = [15, 15, 25, 210];
const HELP_BORDER: Rgba = [0, 200, 120, 180];
const HELP_SIZE: [f32; 2] = [380.0, 390.0];

const BUTTON_BG: Rgba = [40, 40, 60, 255];
const BUTTON_HOVER: Rgba = [60, 60, 90, 255];
const BUTTON_ACTIVE: Rgba = [30, 120, 60, 255];
const BUTTON_TEXT: Rgba = [220, 220, 220, 255];
const INPUT_BG: Rgba = [30, 30, 45, 255];
const INPUT_BORDER: Rgba = [80, 80, 120, 255];
const INPUT_ACTIVE_BORDER: Rgba = [0, 200, 120, 255];
const TOGGLE_ON: Rgba = [0, 200, 120, 255];
const TOGGLE_OFF: Rgba = [80, 80, 100, 255];

pub const CONTROLS: &[(&str, &[(&str, &str)])] = &[
    (
        "Camera",
        &[
            ("WASD", "Move camera"),
            ("Mouse", "Look around"),
            ("Space / LShift", "Fly up / down"),
            ("Escape", "Cancel / leave cursor / quit"),
        ],
    ),
    (
        "Editor",
        &[
            ("F1", "Toggle edit mode"),
            ("F2", "Toggle cursor"),
            ("F3", "Toggle hierarchy"),
            ("H", "Toggle this panel"),
            ("Click", "Select / place object"),
            ("+ / -", "Scale (uniform)"),
            ("1/2/3 + scale", "Stretch X / Y / Z"),
            ("Arrows", "Move object XZ"),
            ("Q / E", "Move object Y"),
            ("C", "Spawn cube at crosshair"),
            ("Delete", "Delete selected"),
            ("Ctrl+S", "Save scene"),
            ("Tab", "Save + print info"),
        ],
    ),
];

fn color(rgba: Rgba) -> ImColor32 {
    ImColor32::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Status lines shown in the top-left corner.
pub fn hud_lines(hud: &HudState) -> Vec<(String, Rgba)> {
    let mut lines = Vec::new();
    if !hud.edit_mode {
        if hud.show_help {
            lines.push(("Press H to hide controls".to_string(), TEXT_DIM));
        }
        return lines;
    }

    lines.push(("[ EDIT MODE ]".to_string(), TEXT_PRIMARY));

    if let Some(kind) = hud.placement {
        lines.push((
            format!("Placing {}: click the floor", kind.name_prefix()),
            [0, 255, 120, 255],
        ));
    }

    match &hud.selected_name {
        Some(name) => {
            let p = hud.selected_position;
            let s = hud.selected_scale;
            lines.push((format!("Selected: {}", name), TEXT_SELECTED));
            lines.push((format!("  Pos: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z), TEXT_DETAIL));
            lines.push((
                format!("  Scale: ({:.4}, {:.4}, {:.4})", s.x, s.y, s.z),
                TEXT_DETAIL,
            ));
            match hud.stretch_axis {
                Some(axis) => {
                    let rgb = crate::editor::layout::AXIS_COLORS[axis as usize];
                    lines.push((format!("  Stretch: {} axis", axis.label()), rgb));
                }
                None => lines.push((
                    "  Stretch: uniform (hold 1/2/3 for X/Y/Z)".to_string(),
                    TEXT_DIM,
                )),
            }
        }
        None => lines.push((
            "No object selected (click to select)".to_string(),
            [180, 180, 180, 180],
        )),
    }

    lines.push(("Press H for controls".to_string(), TEXT_DIM));
    lines
}

/// Draws the whole overlay for one frame.
pub fn draw_overlay(ui: &imgui::Ui, hud: &HudState, widgets: &[Widget], cursor: [f32; 2]) {
    let display = ui.io().display_size;
    if display[0] <= 0.0 || display[1] <= 0.0 {
        return;
    }
    let draw_list = ui.get_foreground_draw_list();

    if !hud.cursor_mode {
        draw_crosshair(&draw_list, display, hud.edit_mode);
    }

    let mut y = 10.0;
    let left = if widgets.iter().any(|w| matches!(w, Widget::Panel { clip: true, .. })) {
        // The hierarchy occupies the left edge.
        280.0
    } else {
        10.0
    };
    for (i, (text, rgba)) in hud_lines(hud).iter().enumerate() {
        draw_list.add_text([left, y], color(*rgba), text);
        y += if i == 0 { 26.0 } else { 18.0 };
    }

    if hud.show_help {
        draw_help(&draw_list, display);
    }

    draw_widgets(&draw_list, widgets, cursor);
}

fn draw_crosshair(draw_list: &DrawListMut<'_>, display: [f32; 2], edit_mode: bool) {
    let (cx, cy) = (display[0] * 0.5, display[1] * 0.5);
    let size = 12.0;
    let rgba = if edit_mode {
        [0, 255, 100, 220]
    } else {
        [255, 255, 255, 180]
    };
    draw_list
        .add_line([cx - size, cy], [cx + size, cy], color(rgba))
        .thickness(2.0)
        .build();
    draw_list
        .add_line([cx, cy - size], [cx, cy + size], color(rgba))
        .thickness(2.0)
        .build();
    draw_list
        .add_circle([cx, cy], 2.0, color(rgba))
        .filled(true)
        .build();
}

fn draw_help(draw_list: &DrawListMut<'_>, display: [f32; 2]) {
    let rect = Rect::new(display[0] - HELP_SIZE[0] - 20.0, 20.0, HELP_SIZE[0], HELP_SIZE[1]);
    draw_list
        .add_rect(rect.min(), rect.max(), color(HELP_BG))
        .filled(true)
        .rounding(6.0)
        .build();
    draw_list
        .add_rect(rect.min(), rect.max(), color(HELP_BORDER))
        .rounding(6.0)
        .thickness(2.0)
        .build();

    let x = rect.x + 15.0;
    let mut y = rect.y + 12.0;
    draw_list.add_text([x, y], color([0, 230, 120, 255]), "CONTROLS");
    y += 30.0;

    for (section, bindings) in CONTROLS {
        draw_list.add_text([x, y], color([100, 200, 255, 220]), format!("-- {} --", section));
        y += 20.0;
        for (key, description) in *bindings {
            draw_list.add_text(
                [x, y],
                color([210, 210, 210, 230]),
                format!("  {:<16}{}", key, description),
            );
            y += 17.0;
        }
        y += 6.0;
    }
}

fn draw_widgets(draw_list: &DrawListMut<'_>, widgets: &[Widget], cursor: [f32; 2]) {
    // Split at each panel so a clipping panel only clips its own widgets.
    let mut start = 0;
    while start < widgets.len() {
        let end = widgets[start + 1..]
            .iter()
            .position(|w| matches!(w, Widget::Panel { .. }))
            .map_or(widgets.len(), |offset| start + 1 + offset);
        let group = &widgets[start..end];

        match group.first() {
            Some(Widget::Panel { rect, clip: true }) => {
                draw_list.with_clip_rect_intersect(rect.min(), rect.max(), || {
                    for widget in group {
                        draw_widget(draw_list, widget, cursor);
                    }
                });
            }
            _ => {
                for widget in group {
                    draw_widget(draw_list, widget, cursor);
                }
            }
        }
        start = end;
    }
}

fn draw_widget(draw_list: &DrawListMut<'_>, widget: &Widget, cursor: [f32; 2]) {
    let hovered = |rect: &Rect| rect.contains(cursor[0], cursor[1]);

    match widget {
        Widget::Panel { rect, .. } => {
            draw_list
                .add_rect(rect.min(), rect.max(), color(crate::editor::layout::PANEL_BG))
                .filled(true)
                .rounding(6.0)
                .build();
            draw_list
                .add_rect(rect.min(), rect.max(), color(crate::editor::layout::PANEL_BORDER))
                .rounding(6.0)
                .thickness(2.0)
                .build();
        }
        Widget::Text { pos, text, color: rgba } => {
            draw_list.add_text(*pos, color(*rgba), text);
        }
        Widget::Fill { rect, color: rgba } => {
            draw_list
                .add_rect(rect.min(), rect.max(), color(*rgba))
                .filled(true)
                .rounding(3.0)
                .build();
        }
        Widget::Button {
            rect,
            label,
            icon,
            active,
        } => {
            let bg = if *active {
                BUTTON_ACTIVE
            } else if hovered(rect) {
                BUTTON_HOVER
            } else {
                BUTTON_BG
            };
            let border = if *active {
                [0, 255, 120, 255]
            } else {
                crate::editor::layout::PANEL_BORDER
            };
            draw_list
                .add_rect(rect.min(), rect.max(), color(bg))
                .filled(true)
                .rounding(4.0)
                .build();
            draw_list
                .add_rect(rect.min(), rect.max(), color(border))
                .rounding(4.0)
                .build();

            let mut text_x = rect.x + 10.0;
            if let Some(icon) = icon {
                let icon_min = [rect.x + 8.0, rect.y + (rect.h - 16.0) * 0.5];
                draw_list
                    .add_rect(icon_min, [icon_min[0] + 16.0, icon_min[1] + 16.0], color(*icon))
                    .filled(true)
                    .rounding(2.0)
                    .build();
                text_x = rect.x + 32.0;
            }
            let text_y = rect.y + (rect.h - crate::ui::manager::FONT_SIZE) * 0.5;
            draw_list.add_text([text_x, text_y], color(BUTTON_TEXT), label);
        }
        Widget::Icon { rect, glyph, color: rgba } => {
            let rgba = if hovered(rect) {
                [rgba[0].saturating_add(80), rgba[1].saturating_add(80), rgba[2].saturating_add(80), 255]
            } else {
                *rgba
            };
            draw_list.add_text([rect.x + 5.0, rect.y + 3.0], color(rgba), glyph.to_string());
        }
        Widget::Input { rect, text, focused } => {
            let border = if *focused {
                INPUT_ACTIVE_BORDER
            } else {
                INPUT_BORDER
            };
            draw_list
                .add_rect(rect.min(), rect.max(), color(INPUT_BG))
                .filled(true)
                .build();
            draw_list
                .add_rect(rect.min(), rect.max(), color(border))
                .rounding(3.0)
                .thickness(2.0)
                .build();

            let text_y = rect.y + (rect.h - crate::ui::manager::FONT_SIZE) * 0.5;
            let shown = if *focused {
                format!("{}|", text)
            } else {
                text.clone()
            };
            draw_list.with_clip_rect_intersect(
                [rect.x + 4.0, rect.y],
                [rect.x + rect.w - 4.0, rect.y + rect.h],
                || {
                    draw_list.add_text([rect.x + 6.0, text_y], color([255, 255, 255, 255]), &shown);
                },
            );
        }
        Widget::Swatch { rect, color: rgba } => {
            draw_list
                .add_rect(rect.min(), rect.max(), color(*rgba))
                .filled(true)
                .rounding(3.0)
                .build();
            draw_list
                .add_rect(rect.min(), rect.max(), color([200, 200, 200, 255]))
                .rounding(3.0)
                .build();
        }
        Widget::Toggle { rect, on } => {
            let bg = if *on { TOGGLE_ON } else { TOGGLE_OFF };
            draw_list
                .add_rect(rect.min(), rect.max(), color(bg))
                .filled(true)
                .rounding(rect.h * 0.5)
                .build();
            let knob_x = if *on { rect.x + 20.0 } else { rect.x + 2.0 };
            draw_list
                .add_circle([knob_x + 9.0, rect.y + rect.h * 0.5], 8.0, color([255, 255, 255, 255]))
                .filled(true)
                .build();
        }
    }
}
