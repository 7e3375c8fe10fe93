//! Screen-space rectangles and the draw list the panels hand to the overlay.
//!
//! Panels lay themselves out once per frame into a list of [`Widget`]s. The
//! same rectangles are used for hit-testing clicks, so what is drawn is
//! exactly what can be clicked.

pub type Rgba = [u8; 4];

pub const PANEL_BG: Rgba = [20, 20, 30, 230];
pub const PANEL_BORDER: Rgba = [0, 200, 120, 200];
pub const SECTION_COLOR: Rgba = [0, 200, 120, 255];
pub const HEADING_COLOR: Rgba = [100, 200, 255, 255];
pub const LABEL_COLOR: Rgba = [180, 180, 180, 255];
pub const HINT_COLOR: Rgba = [120, 120, 120, 255];
pub const FOLDER_COLOR: Rgba = [255, 200, 80, 255];
pub const ITEM_COLOR: Rgba = [200, 200, 200, 255];
pub const ITEM_SELECTED: Rgba = [100, 255, 150, 255];
pub const SELECTED_BG: Rgba = [30, 80, 50, 180];
pub const AXIS_COLORS: [Rgba; 3] = [[255, 80, 80, 255], [80, 255, 80, 255], [80, 80, 255, 255]];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open on the right and bottom edges.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn min(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn max(&self) -> [f32; 2] {
        [self.x + self.w, self.y + self.h]
    }
}

/// One drawable element of a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Panel background with border. `clip` limits the widgets that follow.
    Panel { rect: Rect, clip: bool },
    Text {
        pos: [f32; 2],
        text: String,
        color: Rgba,
    },
    /// Filled highlight behind a row.
    Fill { rect: Rect, color: Rgba },
    Button {
        rect: Rect,
        label: String,
        icon: Option<Rgba>,
        active: bool,
    },
    /// Small glyph button (folder export/delete).
    Icon { rect: Rect, glyph: char, color: Rgba },
    Input {
        rect: Rect,
        text: String,
        focused: bool,
    },
    Swatch { rect: Rect, color: Rgba },
    Toggle { rect: Rect, on: bool },
}

/// Converts a 0..1 color to an opaque [`Rgba`].
pub fn rgba_from_unit(color: cgmath::Vector3<f32>) -> Rgba {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    [byte(color.x), byte(color.y), byte(color.z), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.9, 29.9));
        assert!(!rect.contains(30.0, 15.0));
        assert!(!rect.contains(15.0, 9.0));
    }
}
