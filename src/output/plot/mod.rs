//! SVG rendering of the report figure.
//!
//! Four panels ([`StripChart`], [`ShiftPlot`], [`DensityPlot`],
//! [`AsymmetryPlot`]) wrapped in [`Panel`] and laid out 2×2 by [`compose`].

mod compose;
mod panels;
pub mod style;

pub use compose::{compose, render_svg, render_svg_string, PANEL_LABELS};
pub use panels::{AsymmetryPlot, DensityPlot, Panel, ShiftPlot, StripChart};
pub use style::{AsymmetryStyle, DensityStyle, LayoutConfig, ShiftStyle, StripStyle};
