//! Protected-versus-reference disparity ratios.
//!
//! - disparate impact = protected selection rate / reference selection rate
//! - FPR ratio = protected FPR / reference FPR
//! - FNR ratio = reference FNR / protected FNR
//!
//! A ratio whose inputs include a zero-denominator rate, or whose divisor is
//! zero, is reported as undefined and gets an `N/A` verdict.

use ba_common::{DisparityReport, GroupMetrics, RatioCheck, RatioValue, Threshold};
use ba_config::FairnessThresholds;
use ba_math::guarded_ratio;
use tracing::debug;

fn check(name: &str, value: RatioValue, threshold: Threshold) -> RatioCheck {
    if let RatioValue::Undefined { reason } = &value {
        debug!(ratio = name, reason = %reason, "ratio undefined");
    }
    RatioCheck::evaluate(value, threshold)
}

/// Compare `protected` against `reference`.
pub fn analyze_disparity(
    protected: &GroupMetrics,
    reference: &GroupMetrics,
    thresholds: &FairnessThresholds,
) -> DisparityReport {
    let four_fifths = Threshold::AtLeast {
        min: thresholds.disparate_impact,
    };
    let (low, high) = thresholds.error_rate_parity_band;
    let band = Threshold::Within { low, high };

    DisparityReport {
        protected_group: protected.group.clone(),
        reference_group: reference.group.clone(),
        disparate_impact: check(
            "disparate_impact",
            guarded_ratio(&protected.selection_rate, &reference.selection_rate).into(),
            four_fifths,
        ),
        fpr_ratio: check(
            "fpr_ratio",
            guarded_ratio(&protected.false_positive_rate, &reference.false_positive_rate).into(),
            band,
        ),
        fnr_ratio: check(
            "fnr_ratio",
            guarded_ratio(&reference.false_negative_rate, &protected.false_negative_rate).into(),
            band,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ba_common::{ConfusionMatrix, Verdict};

    fn group(name: &str, tp: u64, fp: u64, tn: u64, fn_: u64) -> GroupMetrics {
        GroupMetrics::from_confusion(name, ConfusionMatrix { tp, fp, tn, fn_ })
    }

    #[test]
    fn scenario_two_groups() {
        let a = group("A", 40, 10, 40, 10);
        let b = group("B", 10, 10, 70, 10);
        assert_eq!(b.false_positive_rate.value(), 0.125);
        assert_eq!(b.false_negative_rate.value(), 0.5);
        assert_eq!(b.selection_rate.value(), 0.2);

        let report = analyze_disparity(&a, &b, &FairnessThresholds::default());
        let di = report.disparate_impact.value.value().unwrap();
        assert!((di - 2.5).abs() < 1e-12);
        assert_eq!(report.disparate_impact.verdict, Verdict::Pass);
        assert!((report.fpr_ratio.value.value().unwrap() - 1.6).abs() < 1e-12);
        assert_eq!(report.fpr_ratio.verdict, Verdict::Fail);
        assert!((report.fnr_ratio.value.value().unwrap() - 2.5).abs() < 1e-12);
        assert!(report.any_failed());
    }

    #[test]
    fn zero_denominator_rate_gives_not_available() {
        let a = group("A", 40, 10, 40, 10);
        let degenerate = group("B", 5, 0, 0, 5);
        assert_eq!(degenerate.false_positive_rate.value(), 0.0);
        assert_eq!(degenerate.false_positive_rate.denominator, 0);

        let report = analyze_disparity(&a, &degenerate, &FairnessThresholds::default());
        assert_eq!(report.fpr_ratio.verdict, Verdict::Undefined);
        assert!(report.fpr_ratio.value.value().is_none());
        assert_ne!(report.disparate_impact.verdict, Verdict::Undefined);
    }

    #[test]
    fn self_comparison_is_one() {
        let a = group("A", 40, 10, 40, 10);
        let report = analyze_disparity(&a, &a, &FairnessThresholds::default());
        assert_eq!(report.disparate_impact.value.value(), Some(1.0));
        assert_eq!(report.fpr_ratio.verdict, Verdict::Pass);
        assert_eq!(report.fnr_ratio.verdict, Verdict::Pass);
        assert!(!report.any_failed());
    }

    #[test]
    fn zero_reference_selection_is_undefined() {
        let a = group("A", 40, 10, 40, 10);
        let none_selected = group("B", 0, 0, 50, 50);
        let report = analyze_disparity(&a, &none_selected, &FairnessThresholds::default());
        assert_eq!(report.disparate_impact.verdict, Verdict::Undefined);
    }

    #[test]
    fn four_fifths_failure() {
        let low = group("A", 10, 10, 70, 10);
        let high = group("B", 40, 10, 40, 10);
        let report = analyze_disparity(&low, &high, &FairnessThresholds::default());
        assert!((report.disparate_impact.value.value().unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(report.disparate_impact.verdict, Verdict::Fail);
    }
}
