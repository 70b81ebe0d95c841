//! The four report panels.
//!
//! A [`Panel`] owns everything it needs to draw itself, so the compositor
//! only has to hand it a drawing area.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::analysis::{AsymmetryFunction, PairwiseAnalysis, ShiftFunction};
use crate::constants::MEDIAN_DECILE;
use crate::error::{Error, Result};
use crate::result::GroupSummary;
use crate::types::{Group, TwoGroups};

use super::style::{
    AsymmetryStyle, DensityStyle, LayoutConfig, ShiftStyle, StripStyle, FONT, REFERENCE,
};

fn plot_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

/// Extend `lo..hi` by `fraction` of its span on both sides.
///
/// A zero span is widened to a unit range so the axis is never empty.
fn padded(lo: f64, hi: f64, fraction: f64) -> Range<f64> {
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        return (lo - 0.5)..(hi + 0.5);
    }
    (lo - span * fraction)..(hi + span * fraction)
}

/// Range over `values` that also includes zero.
fn range_with_zero<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    padded(lo, hi, 0.08)
}

// =============================================================================
// Strip chart
// =============================================================================

/// One-dimensional scatter of both groups with Harrell–Davis median and
/// quartile markers. Values run horizontally; group 1 sits on row 2 (top),
/// group 2 on row 1.
#[derive(Debug, Clone)]
pub struct StripChart {
    names: (String, String),
    points: Vec<(f64, f64, bool)>,
    summaries: [(f64, f64, f64); 2],
    style: StripStyle,
}

impl StripChart {
    /// Build the chart, jittering rows with an RNG seeded from `seed`.
    pub fn new(
        data: &TwoGroups,
        summaries: (&GroupSummary, &GroupSummary),
        style: StripStyle,
        seed: u64,
    ) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let jitter = style.jitter.abs();
        let offset = |rng: &mut Xoshiro256PlusPlus| {
            if jitter > 0.0 {
                rng.random_range(-jitter..jitter)
            } else {
                0.0
            }
        };

        let mut points = Vec::with_capacity(data.group1.len() + data.group2.len());
        for (group, row) in [(Group::Group1, 2.0), (Group::Group2, 1.0)] {
            let first = group == Group::Group1;
            for &v in data.sample(group) {
                points.push((v, row + offset(&mut rng), first));
            }
        }

        let marks = |s: &GroupSummary| (s.hd_q1, s.hd_median, s.hd_q3);
        Self {
            names: (
                data.name(Group::Group1).to_string(),
                data.name(Group::Group2).to_string(),
            ),
            points,
            summaries: [marks(summaries.0), marks(summaries.1)],
            style,
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        layout: &LayoutConfig,
    ) -> Result<()> {
        let style = &self.style;
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));

        let mut chart = ChartBuilder::on(area)
            .caption("Strip chart", (FONT, layout.caption_size))
            .margin(layout.margin)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(padded(lo, hi, 0.05), 0.5..2.5)
            .map_err(plot_error)?;

        let row_label = |y: &f64| {
            if (y - 2.0).abs() < 1e-6 {
                self.names.0.clone()
            } else if (y - 1.0).abs() < 1e-6 {
                self.names.1.clone()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(5)
            .y_label_formatter(&row_label)
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .axis_desc_style((FONT, layout.axis_size))
            .label_style((FONT, layout.axis_size))
            .draw()
            .map_err(plot_error)?;

        let (c1, c2) = style.group_colors;
        chart
            .draw_series(self.points.iter().map(|&(x, y, first)| {
                let color = if first { c1 } else { c2 };
                Circle::new((x, y), style.point_size, color.mix(0.7).filled())
            }))
            .map_err(plot_error)?;

        // Quartiles thin, median thick; group 1 on row 2, group 2 on row 1.
        for (row, &(q1, median, q3)) in [2.0_f64, 1.0].iter().zip(&self.summaries) {
            let thin = style.marker_color.stroke_width(style.line_width);
            let thick = style.marker_color.stroke_width(style.line_width * 2);
            let tick = |x: f64, half: f64, s: ShapeStyle| {
                PathElement::new(vec![(x, row - half), (x, row + half)], s)
            };
            chart
                .draw_series([tick(q1, 0.2, thin), tick(q3, 0.2, thin), tick(median, 0.3, thick)])
                .map_err(plot_error)?;
        }
        Ok(())
    }
}

// =============================================================================
// Shift function
// =============================================================================

/// Decile differences against group-1 deciles, with interval bars and a zero line.
#[derive(Debug, Clone)]
pub struct ShiftPlot {
    /// (group-1 decile, difference, lower, upper)
    rows: Vec<(f64, f64, f64, f64)>,
    style: ShiftStyle,
}

impl ShiftPlot {
    /// Plot the rows of a shift function.
    pub fn new(shift: &ShiftFunction, style: ShiftStyle) -> Self {
        let rows = shift
            .rows
            .iter()
            .map(|r| (r.group1, r.difference.estimate, r.difference.lower, r.difference.upper))
            .collect();
        Self { rows, style }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        layout: &LayoutConfig,
    ) -> Result<()> {
        let style = &self.style;
        let (xlo, xhi) = self
            .rows
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.0), hi.max(r.0)));
        let y_range = range_with_zero(self.rows.iter().flat_map(|r| [r.2, r.3]));
        let x_range = padded(xlo, xhi, 0.08);

        let mut chart = ChartBuilder::on(area)
            .caption("Shift function", (FONT, layout.caption_size))
            .margin(layout.margin)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .axis_desc_style((FONT, layout.axis_size))
            .label_style((FONT, layout.axis_size))
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(LineSeries::new(
                [(x_range.start, 0.0), (x_range.end, 0.0)],
                REFERENCE.stroke_width(style.line_width),
            ))
            .map_err(plot_error)?;
        chart
            .draw_series(LineSeries::new(
                self.rows.iter().map(|r| (r.0, r.1)),
                style.color.stroke_width(style.line_width),
            ))
            .map_err(plot_error)?;
        chart
            .draw_series(self.rows.iter().map(|&(x, y, lo, hi)| {
                ErrorBar::new_vertical(x, lo, y, hi, style.color.stroke_width(style.line_width), 6)
            }))
            .map_err(plot_error)?;
        chart
            .draw_series(self.rows.iter().enumerate().map(|(i, &(x, y, _, _))| {
                let size = if i == MEDIAN_DECILE {
                    style.marker_size + 2
                } else {
                    style.marker_size
                };
                Circle::new((x, y), size, style.color.filled())
            }))
            .map_err(plot_error)?;
        Ok(())
    }
}

// =============================================================================
// Pairwise-difference density
// =============================================================================

/// Kernel density of the pairwise differences with a line at every decile.
#[derive(Debug, Clone)]
pub struct DensityPlot {
    curve: Vec<(f64, f64)>,
    peak: f64,
    deciles: [f64; 9],
    style: DensityStyle,
}

impl DensityPlot {
    /// Plot the density and deciles of a pairwise analysis.
    pub fn new(pairwise: &PairwiseAnalysis, style: DensityStyle) -> Self {
        let curve = pairwise
            .density
            .x
            .iter()
            .copied()
            .zip(pairwise.density.y.iter().copied())
            .collect();
        Self {
            curve,
            peak: pairwise.density.peak(),
            deciles: pairwise.deciles,
            style,
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        layout: &LayoutConfig,
    ) -> Result<()> {
        let style = &self.style;
        let xlo = self.curve.first().map_or(-1.0, |p| p.0);
        let xhi = self.curve.last().map_or(1.0, |p| p.0);
        let peak = self.peak;
        let top = if peak > 0.0 { peak * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .caption("Pairwise differences", (FONT, layout.caption_size))
            .margin(layout.margin)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(xlo..xhi, 0.0..top)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .axis_desc_style((FONT, layout.axis_size))
            .label_style((FONT, layout.axis_size))
            .y_label_formatter(&|y| format!("{y:.3}"))
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(self.deciles.iter().enumerate().map(|(i, &d)| {
                let width = if i == MEDIAN_DECILE {
                    style.line_width * 2
                } else {
                    style.line_width
                };
                PathElement::new(vec![(d, 0.0), (d, top)], style.decile_color.stroke_width(width))
            }))
            .map_err(plot_error)?;
        chart
            .draw_series(LineSeries::new(
                self.curve.iter().copied(),
                style.curve_color.stroke_width(style.line_width),
            ))
            .map_err(plot_error)?;
        Ok(())
    }
}

// =============================================================================
// Difference asymmetry function
// =============================================================================

/// Quantile sums against q, filled where significant after adjustment.
#[derive(Debug, Clone)]
pub struct AsymmetryPlot {
    /// (level, sum, lower, upper, significant)
    rows: Vec<(f64, f64, f64, f64, bool)>,
    style: AsymmetryStyle,
}

impl AsymmetryPlot {
    /// Plot the rows of a difference asymmetry function.
    pub fn new(asymmetry: &AsymmetryFunction, style: AsymmetryStyle) -> Self {
        let rows = asymmetry
            .rows
            .iter()
            .map(|r| (r.level, r.sum.estimate, r.sum.lower, r.sum.upper, r.significant))
            .collect();
        Self { rows, style }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        layout: &LayoutConfig,
    ) -> Result<()> {
        let style = &self.style;
        let (xlo, xhi) = self
            .rows
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.0), hi.max(r.0)));
        let x_range = padded(xlo, xhi, 0.08);
        let y_range = range_with_zero(self.rows.iter().flat_map(|r| [r.2, r.3]));

        let mut chart = ChartBuilder::on(area)
            .caption("Difference asymmetry", (FONT, layout.caption_size))
            .margin(layout.margin)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .axis_desc_style((FONT, layout.axis_size))
            .label_style((FONT, layout.axis_size))
            .x_label_formatter(&|x| format!("{x:.2}"))
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(LineSeries::new(
                [(x_range.start, 0.0), (x_range.end, 0.0)],
                REFERENCE.stroke_width(style.line_width),
            ))
            .map_err(plot_error)?;
        chart
            .draw_series(LineSeries::new(
                self.rows.iter().map(|r| (r.0, r.1)),
                style.color.stroke_width(style.line_width),
            ))
            .map_err(plot_error)?;
        chart
            .draw_series(self.rows.iter().map(|&(x, y, lo, hi, _)| {
                ErrorBar::new_vertical(x, lo, y, hi, style.color.stroke_width(style.line_width), 6)
            }))
            .map_err(plot_error)?;
        chart
            .draw_series(self.rows.iter().map(|&(x, y, _, _, significant)| {
                let shape = if significant {
                    style.color.filled()
                } else {
                    // White fill under the outline hides the interval bar.
                    WHITE.filled()
                };
                Circle::new((x, y), style.marker_size, shape)
            }))
            .map_err(plot_error)?;
        chart
            .draw_series(self.rows.iter().filter(|r| !r.4).map(|&(x, y, ..)| {
                Circle::new((x, y), style.marker_size, style.color.stroke_width(2))
            }))
            .map_err(plot_error)?;
        Ok(())
    }
}

/// A renderable report panel.
#[derive(Debug, Clone)]
pub enum Panel {
    /// Strip chart of both groups.
    Strip(StripChart),
    /// Shift function.
    Shift(ShiftPlot),
    /// Pairwise-difference density.
    Density(DensityPlot),
    /// Difference asymmetry function.
    Asymmetry(AsymmetryPlot),
}

impl Panel {
    /// Short name of the panel.
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Strip(_) => "Strip chart",
            Panel::Shift(_) => "Shift function",
            Panel::Density(_) => "Pairwise differences",
            Panel::Asymmetry(_) => "Difference asymmetry",
        }
    }

    /// Draw the panel into `area`.
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        layout: &LayoutConfig,
    ) -> Result<()> {
        match self {
            Panel::Strip(p) => p.draw(area, layout),
            Panel::Shift(p) => p.draw(area, layout),
            Panel::Density(p) => p.draw(area, layout),
            Panel::Asymmetry(p) => p.draw(area, layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        let r = padded(0.0, 10.0, 0.1);
        assert_eq!(r, -1.0..11.0);
        let flat = padded(3.0, 3.0, 0.1);
        assert!(flat.start < 3.0 && flat.end > 3.0);
    }

    #[test]
    fn test_range_with_zero() {
        let r = range_with_zero([2.0, 5.0]);
        assert!(r.start < 0.0 && r.end > 5.0);
    }

    #[test]
    fn test_strip_chart_jitter_stays_in_row() {
        let data = TwoGroups::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0]);
        let summary = |name: &str| GroupSummary {
            name: name.to_string(),
            n: 3,
            mean: 2.0,
            hd_q1: 1.5,
            hd_median: 2.0,
            hd_q3: 2.5,
        };
        let (s1, s2) = (summary("Group1"), summary("Group2"));
        let chart = StripChart::new(&data, (&s1, &s2), StripStyle::default(), 5);
        assert_eq!(chart.points.len(), 5);
        for &(_, y, first) in &chart.points {
            let row = if first { 2.0 } else { 1.0 };
            assert!((y - row).abs() <= 0.15);
        }
    }

    #[test]
    fn test_strip_chart_rows_follow_groups() {
        let data =
            TwoGroups::new(vec![1.0, 2.0], vec![7.0, 8.0, 9.0]).with_names("before", "after");
        let summary = GroupSummary {
            name: String::new(),
            n: 2,
            mean: 0.0,
            hd_q1: 0.0,
            hd_median: 0.0,
            hd_q3: 0.0,
        };
        let chart = StripChart::new(&data, (&summary, &summary), StripStyle::default(), 1);
        assert_eq!(chart.names, ("before".to_string(), "after".to_string()));
        let top: Vec<f64> = chart.points.iter().filter(|p| p.2).map(|p| p.0).collect();
        let bottom: Vec<f64> = chart.points.iter().filter(|p| !p.2).map(|p| p.0).collect();
        assert_eq!(top, vec![1.0, 2.0]);
        assert_eq!(bottom, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_density_plot_uses_curve_peak() {
        use crate::analysis::{analyze_pairwise, PairwiseConfig};

        let g1: Vec<f64> = (0..12).map(|x| (x as f64 * 0.9).sin() + 3.0).collect();
        let g2: Vec<f64> = (0..10).map(|x| (x as f64 * 1.7).cos() + 2.0).collect();
        let config = PairwiseConfig {
            bootstrap_samples: 20,
            ..PairwiseConfig::default()
        };
        let pairwise = analyze_pairwise(&g1, &g2, &config, 2).unwrap();
        let plot = DensityPlot::new(&pairwise, DensityStyle::default());
        let max_y = plot.curve.iter().fold(0.0_f64, |m, p| m.max(p.1));
        assert_eq!(plot.peak, max_y);
        assert!(plot.peak > 0.0);
    }
}
