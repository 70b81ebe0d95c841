//! 2×2 composite figure with panel labels.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};

use super::panels::Panel;
use super::style::{LayoutConfig, FONT, INK};

/// Panel labels, in row-major order.
pub const PANEL_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Draw four panels into a 2×2 grid on `root`, labelling them A–D.
///
/// Every cell gets the same size; the label sits in the cell's top-left
/// corner and the panel is drawn below it.
///
/// # Errors
///
/// Fails unless exactly four panels are given, or if the backend fails.
pub fn compose<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[Panel],
    layout: &LayoutConfig,
) -> Result<()> {
    if panels.len() != PANEL_LABELS.len() {
        return Err(Error::InvalidInput(format!(
            "composite figure needs exactly 4 panels, got {}",
            panels.len()
        )));
    }

    root.fill(&WHITE).map_err(|e| Error::Plot(e.to_string()))?;

    let label_style = (FONT, layout.label_size).into_font().color(&INK);
    let cells = root.split_evenly((2, 2));
    for ((cell, panel), label) in cells.iter().zip(panels).zip(PANEL_LABELS) {
        cell.draw_text(label, &label_style, (layout.margin as i32, layout.margin as i32))
            .map_err(|e| Error::Plot(e.to_string()))?;
        let body = cell.margin(layout.label_size + layout.margin, 0, layout.label_size, 0);
        panel.draw(&body, layout)?;
        tracing::trace!(label, panel = panel.title(), "panel drawn");
    }

    root.present().map_err(|e| Error::Plot(e.to_string()))?;
    Ok(())
}

/// Render the composite figure as an SVG file at `path`.
pub fn render_svg(panels: &[Panel], layout: &LayoutConfig, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    compose(&root, panels, layout)?;
    tracing::debug!(path = %path.display(), "wrote composite figure");
    Ok(())
}

/// Render the composite figure to an SVG document in memory.
pub fn render_svg_string(panels: &[Panel], layout: &LayoutConfig) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (layout.width, layout.height)).into_drawing_area();
        compose(&root, panels, layout)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_requires_four_panels() {
        let err = render_svg_string(&[], &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
