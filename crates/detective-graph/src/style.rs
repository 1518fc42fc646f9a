//! Noir color scheme shared by the canvas and the surrounding screens.

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) * (1.0 - factor)) as u8,
            g: ((self.g as f32) * (1.0 - factor)) as u8,
            b: ((self.b as f32) * (1.0 - factor)) as u8,
            a: self.a,
        }
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

pub mod palette {
    use super::Color;

    pub const DARK_BG: Color = Color::rgb(20, 20, 25);
    pub const DARKER_BG: Color = Color::rgb(15, 15, 20);
    pub const LIGHT_BG: Color = Color::rgb(40, 40, 50);
    pub const ACCENT: Color = Color::rgb(200, 150, 100);
    pub const TEXT: Color = Color::rgb(220, 220, 220);
    pub const TEXT_DIM: Color = Color::rgb(150, 150, 150);
    pub const TEXT_BRIGHT: Color = Color::rgb(255, 255, 255);
    pub const ERROR: Color = Color::rgb(200, 80, 80);
    pub const SUCCESS: Color = Color::rgb(100, 200, 100);
    pub const BORDER: Color = Color::rgb(100, 100, 120);
}

/// Visual constants for the case graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStyle {
    pub edge_color: Color,
    pub edge_width: f32,
    pub arrow_length: f32,
    /// Half-angle of the arrowhead, in radians.
    pub arrow_angle: f32,
    pub node_stroke: Color,
    pub node_stroke_width: f32,
    pub selected: Color,
    pub highlighted: Color,
    pub label: Color,
    pub background: Color,
    pub border: Color,
    /// Relationship labels appear at or above this zoom.
    pub edge_label_zoom: f32,
    /// Node names appear above this zoom.
    pub node_label_zoom: f32,
    /// Gap between the bottom of a node circle and its name.
    pub node_label_gap: f32,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            edge_color: palette::BORDER,
            edge_width: 2.0,
            arrow_length: 10.0,
            arrow_angle: std::f32::consts::FRAC_PI_6,
            node_stroke: palette::TEXT_BRIGHT,
            node_stroke_width: 2.0,
            selected: palette::SUCCESS,
            highlighted: palette::ACCENT.lighten(0.3),
            label: palette::TEXT,
            background: palette::DARKER_BG,
            border: palette::BORDER,
            edge_label_zoom: 1.5,
            node_label_zoom: 0.7,
            node_label_gap: 12.0,
        }
    }
}

pub const DEFAULT_NODE_COLOR: Color = Color::rgb(128, 128, 128);

/// Fill color keyed on a node's primary label.
pub fn node_fill(primary_label: &str) -> Color {
    match primary_label {
        "Suspect" => palette::ACCENT,
        "Victim" => Color::rgb(200, 80, 80),
        "Location" => Color::rgb(100, 150, 200),
        "Bank" => Color::rgb(100, 200, 150),
        _ => DEFAULT_NODE_COLOR,
    }
}
