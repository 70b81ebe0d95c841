//! Per-panel styling.
//!
//! Each panel type has its own style struct with explicit fields; there is no
//! shared theme object.

use plotters::style::RGBColor;

/// Dark grey used for axes, zero lines and panel labels.
pub const INK: RGBColor = RGBColor(40, 40, 40);
/// Light grey for reference lines.
pub const REFERENCE: RGBColor = RGBColor(150, 150, 150);
/// Group 1 colour.
pub const GROUP1: RGBColor = RGBColor(230, 159, 0);
/// Group 2 colour.
pub const GROUP2: RGBColor = RGBColor(86, 180, 233);
/// Colour of estimates and intervals.
pub const ESTIMATE: RGBColor = RGBColor(0, 114, 178);

/// Font family used for every text element.
pub const FONT: &str = "sans-serif";

/// Strip chart: values on the horizontal axis, one row per group.
#[derive(Debug, Clone)]
pub struct StripStyle {
    /// Horizontal axis description.
    pub x_label: String,
    /// Vertical axis description.
    pub y_label: String,
    /// Point colours of group 1 and group 2.
    pub group_colors: (RGBColor, RGBColor),
    /// Colour of the median and quartile markers.
    pub marker_color: RGBColor,
    /// Radius of each observation.
    pub point_size: u32,
    /// Width of the quartile markers; the median marker is drawn twice as wide.
    pub line_width: u32,
    /// Maximum vertical jitter, in row units.
    pub jitter: f64,
}

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            x_label: "Scores".to_string(),
            y_label: "Groups".to_string(),
            group_colors: (GROUP1, GROUP2),
            marker_color: INK,
            point_size: 3,
            line_width: 1,
            jitter: 0.15,
        }
    }
}

/// Shift function: group-1 deciles against decile differences.
#[derive(Debug, Clone)]
pub struct ShiftStyle {
    /// Horizontal axis description.
    pub x_label: String,
    /// Vertical axis description.
    pub y_label: String,
    /// Colour of estimates, intervals and connecting line.
    pub color: RGBColor,
    /// Marker radius; the median decile is drawn one step larger.
    pub marker_size: u32,
    /// Width of the interval bars and connecting line.
    pub line_width: u32,
}

impl Default for ShiftStyle {
    fn default() -> Self {
        Self {
            x_label: "Group1 deciles".to_string(),
            y_label: "Group1 - Group2 decile differences".to_string(),
            color: ESTIMATE,
            marker_size: 4,
            line_width: 1,
        }
    }
}

/// Kernel density of the pairwise differences with decile markers.
#[derive(Debug, Clone)]
pub struct DensityStyle {
    /// Horizontal axis description.
    pub x_label: String,
    /// Vertical axis description.
    pub y_label: String,
    /// Colour of the density curve.
    pub curve_color: RGBColor,
    /// Colour of the decile lines.
    pub decile_color: RGBColor,
    /// Width of the density curve and decile lines; the median line is doubled.
    pub line_width: u32,
}

impl Default for DensityStyle {
    fn default() -> Self {
        Self {
            x_label: "Group1 - Group2 differences".to_string(),
            y_label: "Density".to_string(),
            curve_color: INK,
            decile_color: ESTIMATE,
            line_width: 1,
        }
    }
}

/// Difference asymmetry function.
#[derive(Debug, Clone)]
pub struct AsymmetryStyle {
    /// Horizontal axis description.
    pub x_label: String,
    /// Vertical axis description.
    pub y_label: String,
    /// Colour of estimates, intervals and connecting line.
    pub color: RGBColor,
    /// Marker radius; significant levels are filled, the others outlined.
    pub marker_size: u32,
    /// Width of the interval bars.
    pub line_width: u32,
}

impl Default for AsymmetryStyle {
    fn default() -> Self {
        Self {
            x_label: "Quantiles".to_string(),
            y_label: "Quantile sum = q + 1-q".to_string(),
            color: ESTIMATE,
            marker_size: 4,
            line_width: 1,
        }
    }
}

/// Size and labelling of the composite figure.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Font size of the A–D panel labels.
    pub label_size: u32,
    /// Font size of panel captions.
    pub caption_size: u32,
    /// Font size of axis descriptions and tick labels.
    pub axis_size: u32,
    /// Margin around each panel, in pixels.
    pub margin: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            label_size: 28,
            caption_size: 18,
            axis_size: 14,
            margin: 10,
        }
    }
}
