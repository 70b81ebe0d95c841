//! `Report` entry point and builder.

use std::path::Path;
use std::time::Instant;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::analysis::{
    analyze_pairwise, asymmetry_function, cliffs_delta, ks_test, shift_function, welch_t_test,
    weighted_ks_test, wilcoxon_rank_sum, CoverageAdjustment,
};
use crate::config::ReportConfig;
use crate::data::{generate_pair, SampleSpec};
use crate::error::Result;
use crate::output::plot::{
    render_svg, render_svg_string, AsymmetryPlot, AsymmetryStyle, DensityPlot, DensityStyle,
    LayoutConfig, Panel, ShiftPlot, ShiftStyle, StripChart, StripStyle,
};
use crate::result::{ClassicalTests, GroupSummary, Interpretation, Metadata, ReportResult};
use crate::statistics::{harrell_davis, mean};
use crate::types::TwoGroups;

/// Styles of the four panels.
#[derive(Debug, Clone, Default)]
pub struct PanelStyles {
    /// Strip chart (panel A).
    pub strip: StripStyle,
    /// Shift function (panel B).
    pub shift: ShiftStyle,
    /// Pairwise-difference density (panel C).
    pub density: DensityStyle,
    /// Difference asymmetry function (panel D).
    pub asymmetry: AsymmetryStyle,
}

/// Two-sample comparison report.
///
/// Use the builder methods to configure, then [`run`](Report::run) or
/// [`render`](Report::render).
///
/// # Example
///
/// ```ignore
/// use diffasym::Report;
///
/// let outcome = Report::new()
///     .seed(7)
///     .shift_bootstrap(500)
///     .render("report.svg")?;
///
/// println!("{}", diffasym::output::format_report(&outcome.result));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Report {
    config: ReportConfig,
    layout: LayoutConfig,
    styles: PanelStyles,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// The two samples the report was computed on.
    pub data: TwoGroups,
    /// Numeric results.
    pub result: ReportResult,
    /// Panels A–D, ready for composition.
    pub panels: Vec<Panel>,
    /// Figure layout.
    pub layout: LayoutConfig,
}

impl ReportOutcome {
    /// Write the composite figure to `path` as SVG.
    pub fn render_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        render_svg(&self.panels, &self.layout, path.as_ref())
    }

    /// The composite figure as an SVG document.
    pub fn svg_string(&self) -> Result<String> {
        render_svg_string(&self.panels, &self.layout)
    }
}

impl Report {
    /// Create with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Fast configuration for tests and previews.
    ///
    /// Settings:
    /// - 100 shift-function bootstrap samples (vs 200 default)
    /// - 200 pairwise bootstrap samples (vs 1,000 default)
    /// - 100 asymmetry bootstrap samples (same as default)
    /// - 200 weighted KS permutations (vs 1,000 default)
    pub fn quick() -> Self {
        Self::new()
            .shift_bootstrap(100)
            .pairwise_bootstrap(200)
            .asymmetry_bootstrap(100)
            .weighted_ks_permutations(200)
    }

    /// Set the base seed; every stage seed is re-derived from it.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Set the size of both groups.
    pub fn sample_size(mut self, n: usize) -> Self {
        self.config = self.config.with_sample_size(n);
        self
    }

    /// Replace both sample recipes.
    pub fn samples(mut self, group1: SampleSpec, group2: SampleSpec) -> Self {
        self.config.group1 = group1;
        self.config.group2 = group2;
        self
    }

    /// Set the display names of the groups.
    pub fn group_names(mut self, name1: impl Into<String>, name2: impl Into<String>) -> Self {
        self.config.names = (name1.into(), name2.into());
        self
    }

    /// Set the significance level of every stage.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self.config.shift.alpha = alpha;
        self.config.pairwise.alpha = alpha;
        self.config.asymmetry.alpha = alpha;
        self
    }

    /// Set the shift-function bootstrap count.
    pub fn shift_bootstrap(mut self, n: usize) -> Self {
        self.config.shift.bootstrap_samples = n;
        self
    }

    /// Set the shift-function coverage adjustment.
    pub fn coverage(mut self, adjustment: CoverageAdjustment) -> Self {
        self.config.shift.adjustment = adjustment;
        self
    }

    /// Set the pairwise-median bootstrap count.
    pub fn pairwise_bootstrap(mut self, n: usize) -> Self {
        self.config.pairwise.bootstrap_samples = n;
        self
    }

    /// Set the difference-asymmetry bootstrap count.
    pub fn asymmetry_bootstrap(mut self, n: usize) -> Self {
        self.config.asymmetry.bootstrap_samples = n;
        self
    }

    /// Set the asymmetry quantile levels (each in (0, 0.5)).
    pub fn asymmetry_levels(mut self, levels: Vec<f64>) -> Self {
        self.config.asymmetry.levels = levels;
        self
    }

    /// Set the weighted KS permutation count.
    pub fn weighted_ks_permutations(mut self, n: usize) -> Self {
        self.config.weighted_ks_permutations = n;
        self
    }

    /// Merge overrides from `DIFFASYM_*` environment variables.
    pub fn from_env(mut self) -> Self {
        self.config = self.config.from_env();
        self
    }

    /// Set the figure layout.
    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the panel styles.
    pub fn styles(mut self, styles: PanelStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate the samples and run every stage.
    ///
    /// # Errors
    ///
    /// The first failing stage aborts the run; its error is returned unchanged.
    pub fn run(&self) -> Result<ReportOutcome> {
        let seeds = &self.config.seeds;
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(seeds.group1);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(seeds.group2);
        let data = generate_pair(&self.config.group1, &mut rng1, &self.config.group2, &mut rng2)?
            .with_names(self.config.names.0.clone(), self.config.names.1.clone());
        self.run_on(data)
    }

    /// Run every analysis stage on existing samples.
    pub fn run_on(&self, data: TwoGroups) -> Result<ReportOutcome> {
        let start = Instant::now();
        let config = &self.config;
        let seeds = &config.seeds;
        let _span = tracing::info_span!("report", seed = config.base_seed).entered();

        let group1 = summarize(&data.name1, &data.group1)?;
        let group2 = summarize(&data.name2, &data.group2)?;

        let classical = {
            let _stage = tracing::debug_span!("classical").entered();
            let (a, b) = (&data.group1, &data.group2);
            ClassicalTests {
                welch: welch_t_test(a, b, config.conf_level)?,
                wilcoxon: wilcoxon_rank_sum(a, b)?,
                cliffs_delta: cliffs_delta(a, b, config.alpha)?,
                ks: ks_test(a, b)?,
                weighted_ks: weighted_ks_test(
                    a,
                    b,
                    config.weighted_ks_permutations,
                    seeds.weighted_ks,
                )?,
            }
        };
        tracing::debug!(
            welch_p = classical.welch.p_value,
            wilcoxon_p = classical.wilcoxon.p_value,
            ks_p = classical.ks.p_value,
            "classical tests done"
        );

        let shift = {
            let _stage = tracing::debug_span!("shift").entered();
            shift_function(&data, &config.shift, seeds.shift)?
        };
        let pairwise = {
            let _stage = tracing::debug_span!("pairwise").entered();
            analyze_pairwise(&data.group1, &data.group2, &config.pairwise, seeds.pairwise)?
        };
        let asymmetry = {
            let _stage = tracing::debug_span!("asymmetry").entered();
            asymmetry_function(&data.group1, &data.group2, &config.asymmetry, seeds.asymmetry)?
        };

        let interpretation = Interpretation {
            alpha: config.alpha,
            means_differ: classical.welch.is_significant(config.alpha),
            ranks_differ: classical.wilcoxon.is_significant(config.alpha),
            distributions_differ: classical.ks.is_significant(config.alpha),
            shifted_deciles: shift.excluding_zero().map(|r| r.level).collect(),
            asymmetric_levels: asymmetry
                .rows
                .iter()
                .filter(|r| r.significant)
                .map(|r| r.level)
                .collect(),
        };

        let panels = vec![
            Panel::Strip(StripChart::new(
                &data,
                (&group1, &group2),
                self.styles.strip.clone(),
                seeds.jitter,
            )),
            Panel::Shift(ShiftPlot::new(&shift, self.styles.shift.clone())),
            Panel::Density(DensityPlot::new(&pairwise, self.styles.density.clone())),
            Panel::Asymmetry(AsymmetryPlot::new(&asymmetry, self.styles.asymmetry.clone())),
        ];

        let runtime_secs = start.elapsed().as_secs_f64();
        tracing::info!(
            runtime_secs,
            location_tests_miss_difference = interpretation.location_tests_miss_difference(),
            "report complete"
        );

        let result = ReportResult {
            group1,
            group2,
            classical,
            shift,
            pairwise,
            asymmetry,
            interpretation,
            metadata: Metadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                base_seed: config.base_seed,
                seeds: *seeds,
                parallel: cfg!(feature = "parallel"),
                runtime_secs,
            },
        };

        Ok(ReportOutcome {
            data,
            result,
            panels,
            layout: self.layout.clone(),
        })
    }

    /// Run the report and write the composite figure to `path`.
    pub fn render(&self, path: impl AsRef<Path>) -> Result<ReportOutcome> {
        let outcome = self.run()?;
        outcome.render_svg(path)?;
        Ok(outcome)
    }
}

fn summarize(name: &str, sample: &[f64]) -> Result<GroupSummary> {
    Ok(GroupSummary {
        name: name.to_string(),
        n: sample.len(),
        mean: mean(sample),
        hd_q1: harrell_davis(sample, 0.25)?,
        hd_median: harrell_davis(sample, 0.5)?,
        hd_q3: harrell_davis(sample, 0.75)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Report {
        Report::new()
            .sample_size(12)
            .shift_bootstrap(20)
            .pairwise_bootstrap(20)
            .asymmetry_bootstrap(20)
            .weighted_ks_permutations(20)
    }

    #[test]
    fn test_run_produces_four_panels() {
        let outcome = tiny().run().unwrap();
        assert_eq!(outcome.panels.len(), 4);
        assert_eq!(outcome.panels[0].title(), "Strip chart");
        assert_eq!(outcome.result.pairwise.count, 144);
        assert_eq!(outcome.result.group1.n, 12);
    }

    #[test]
    fn test_group_names_flow_through() {
        let outcome = tiny().group_names("control", "treatment").run().unwrap();
        assert_eq!(outcome.data.name1, "control");
        assert_eq!(outcome.result.group2.name, "treatment");
    }

    #[test]
    fn test_invalid_stage_config_aborts() {
        let err = tiny().asymmetry_levels(vec![0.6]).run().unwrap_err();
        assert!(err.to_string().contains("asymmetry levels"));
        assert!(tiny().sample_size(1).run().is_err());
    }

    #[test]
    fn test_metadata_records_seeds() {
        let outcome = tiny().seed(5).run().unwrap();
        assert_eq!(outcome.result.metadata.base_seed, 5);
        assert_eq!(outcome.result.metadata.seeds, crate::config::StageSeeds::from_base(5));
    }
}
