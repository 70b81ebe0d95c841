//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::analysis::{CoverageAdjustment, TestOutcome};
use crate::result::{GroupSummary, ReportResult};

/// Format a ReportResult for human-readable terminal output.
///
/// Colors follow `colored`'s global override, so callers can switch them off
/// with `colored::control::set_override(false)`.
pub fn format_report(result: &ReportResult) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(70);
    let alpha = result.interpretation.alpha;

    output.push_str("diffasym\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    for group in [&result.group1, &result.group2] {
        output.push_str(&format_group(group));
    }
    output.push('\n');

    output.push_str(&format!("  {}\n", "Classical tests".bold()));
    let tests = &result.classical;
    for test in [
        &tests.welch,
        &tests.wilcoxon,
        &tests.cliffs_delta,
        &tests.ks,
        &tests.weighted_ks,
    ] {
        output.push_str(&format_test(test, alpha));
    }
    output.push('\n');

    let shift = &result.shift;
    output.push_str(&format!(
        "  {} ({} - {}, {}, {} bootstrap samples)\n",
        "Shift function".bold(),
        result.group1.name,
        result.group2.name,
        format_adjustment(shift.adjustment),
        shift.bootstrap_samples
    ));
    output.push_str("      q   group 1   group 2      diff     lower     upper   p adj\n");
    for row in &shift.rows {
        output.push_str(&format!(
            "    {:.1} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}   {}\n",
            row.level,
            row.group1,
            row.group2,
            row.difference.estimate,
            row.difference.lower,
            row.difference.upper,
            format_p(row.p_adjusted, row.significant)
        ));
    }
    output.push('\n');

    let pairwise = &result.pairwise;
    output.push_str(&format!(
        "  {} ({} differences, bandwidth {:.3})\n",
        "Pairwise differences".bold(),
        pairwise.count,
        pairwise.density.bandwidth
    ));
    output.push_str(&format!(
        "    Median: {:.3} ({:.0}% CI: {:.3} to {:.3}, {} bootstrap samples)\n",
        pairwise.median.estimate,
        (1.0 - alpha) * 100.0,
        pairwise.median.lower,
        pairwise.median.upper,
        pairwise.bootstrap_samples
    ));
    let deciles: Vec<String> = pairwise.deciles.iter().map(|d| format!("{d:.2}")).collect();
    output.push_str(&format!("    Deciles: {}\n", deciles.join("  ")));
    output.push('\n');

    let asymmetry = &result.asymmetry;
    output.push_str(&format!(
        "  {} (Hochberg, alpha = {}, {} bootstrap samples)\n",
        "Difference asymmetry".bold(),
        asymmetry.alpha,
        asymmetry.bootstrap_samples
    ));
    output.push_str("       q       sum     lower     upper   p adj\n");
    for row in &asymmetry.rows {
        output.push_str(&format!(
            "    {:.2} {:>9.3} {:>9.3} {:>9.3}   {}\n",
            row.level,
            row.sum.estimate,
            row.sum.lower,
            row.sum.upper,
            format_p(row.p_adjusted, row.significant)
        ));
    }
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');
    for line in result.interpretation.narrative() {
        output.push_str(&line);
        output.push('\n');
    }
    if result.interpretation.location_tests_miss_difference() {
        output.push_str(&format!(
            "{}\n",
            "\u{26A0} Location tests miss a distributional difference".yellow().bold()
        ));
    }

    output
}

fn format_group(group: &GroupSummary) -> String {
    format!(
        "  {}: n = {}, mean = {:.3}, HD quartiles = {:.3} / {:.3} / {:.3}\n",
        group.name.bold(),
        group.n,
        group.mean,
        group.hd_q1,
        group.hd_median,
        group.hd_q3
    )
}

fn format_test(test: &TestOutcome, alpha: f64) -> String {
    let mut line = format!(
        "    {:<36} stat = {:>8.4}  p = {}",
        test.name,
        test.statistic,
        format_p(test.p_value, test.is_significant(alpha))
    );
    if let Some(df) = test.df {
        line.push_str(&format!("  df = {df:.1}"));
    }
    if let Some(estimate) = test.estimate {
        line.push_str(&format!("  est = {estimate:.4}"));
    }
    if let Some((lo, hi)) = test.conf_int {
        line.push_str(&format!(" [{lo:.4}, {hi:.4}]"));
    }
    line.push('\n');
    line
}

/// Format a p-value, highlighted when significant.
fn format_p(p: f64, significant: bool) -> String {
    let text = if p < 1e-4 {
        format!("{p:.1e}")
    } else {
        format!("{p:.4}")
    };
    if significant {
        format!("{} *", text).yellow().bold().to_string()
    } else {
        text.green().to_string()
    }
}

fn format_adjustment(adjustment: CoverageAdjustment) -> &'static str {
    match adjustment {
        CoverageAdjustment::Hochberg => "Hochberg-adjusted percentile CIs",
        CoverageAdjustment::MaxStatistic => "max-statistic simultaneous CIs",
        CoverageAdjustment::Bonferroni => "Bonferroni simultaneous CIs",
        CoverageAdjustment::Unadjusted => "unadjusted CIs",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Report;

    fn small_result() -> ReportResult {
        Report::new()
            .sample_size(20)
            .shift_bootstrap(40)
            .pairwise_bootstrap(40)
            .asymmetry_bootstrap(40)
            .weighted_ks_permutations(40)
            .run()
            .unwrap()
            .result
    }

    #[test]
    fn test_format_report_sections() {
        colored::control::set_override(false);
        let output = format_report(&small_result());
        assert!(output.starts_with("diffasym"));
        assert!(output.contains("Welch two-sample t-test"));
        assert!(output.contains("Shift function"));
        assert!(output.contains("Pairwise differences (400 differences"));
        assert!(output.contains("Difference asymmetry"));
    }

    #[test]
    fn test_format_p() {
        colored::control::set_override(false);
        assert_eq!(format_p(0.5, false), "0.5000");
        assert_eq!(format_p(0.01, true), "0.0100 *");
        assert_eq!(format_p(0.00001, false), "1.0e-5");
    }
}
