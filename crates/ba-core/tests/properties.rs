//! Property-based tests for metric and filter invariants.

use ba_common::{RatioValue, Verdict};
use ba_config::FairnessThresholds;
use ba_core::{analyze_disparity, compute_group_metrics, AuditRecord, LabeledRecord, RecordFilter};
use proptest::prelude::*;

const GROUPS: [&str; 3] = ["A", "B", "C"];

fn groups() -> Vec<String> {
    GROUPS.iter().map(|g| g.to_string()).collect()
}

fn labeled_record() -> impl Strategy<Value = LabeledRecord> {
    (0usize..GROUPS.len(), 1u8..=10, any::<bool>()).prop_map(|(g, score, reoffended)| {
        LabeledRecord {
            group: GROUPS[g].to_string(),
            decile_score: score,
            predicted_high_risk: score >= 5,
            reoffended,
        }
    })
}

fn audit_record() -> impl Strategy<Value = AuditRecord> {
    (
        prop::option::of(-60.0f64..60.0),
        -1i64..=1,
        prop::sample::select(vec!["F", "M", "O"]),
        prop::option::of(prop::sample::select(vec!["Low", "Medium", "High"])),
    )
        .prop_map(|(days, is_recid, degree, text)| AuditRecord {
            line: 2,
            group: "A".to_string(),
            decile_score: 5,
            two_year_recid: is_recid == 1,
            is_recid,
            days_b_screening_arrest: days,
            c_charge_degree: degree.to_string(),
            score_text: text.map(str::to_string),
        })
}

fn rate_in_range(value: f64, defined: bool) -> bool {
    if defined {
        (0.0..=1.0).contains(&value)
    } else {
        value == 0.0
    }
}

proptest! {
    #[test]
    fn confusion_cells_sum_to_group_size(records in prop::collection::vec(labeled_record(), 0..200)) {
        let metrics = compute_group_metrics(&records, &groups());
        prop_assert_eq!(metrics.len(), GROUPS.len());
        for m in &metrics {
            let expected = records.iter().filter(|r| r.group == m.group).count() as u64;
            let cm = m.confusion;
            prop_assert_eq!(cm.tp + cm.fp + cm.tn + cm.fn_, expected);
            prop_assert_eq!(m.sample_size, expected);
        }
    }

    #[test]
    fn rates_are_probabilities_or_sentinel(records in prop::collection::vec(labeled_record(), 0..200)) {
        for m in compute_group_metrics(&records, &groups()) {
            for (name, rate) in m.rates() {
                prop_assert!(
                    rate_in_range(rate.value(), rate.is_defined()),
                    "{} for {} out of range: {}", name, m.group, rate
                );
            }
        }
    }

    #[test]
    fn selection_rate_is_predicted_positive_share(records in prop::collection::vec(labeled_record(), 1..200)) {
        for m in compute_group_metrics(&records, &groups()) {
            if m.sample_size == 0 {
                continue;
            }
            let expected = (m.confusion.tp + m.confusion.fp) as f64 / m.sample_size as f64;
            prop_assert_eq!(m.selection_rate.value(), expected);
        }
    }

    #[test]
    fn group_against_itself_is_parity(records in prop::collection::vec(labeled_record(), 1..200)) {
        let thresholds = FairnessThresholds::default();
        for m in compute_group_metrics(&records, &groups()) {
            let report = analyze_disparity(&m, &m, &thresholds);
            if m.selection_rate.is_defined() && m.selection_rate.numerator > 0 {
                prop_assert_eq!(&report.disparate_impact.value, &RatioValue::Defined { value: 1.0 });
                prop_assert_eq!(report.disparate_impact.verdict, Verdict::Pass);
            } else {
                prop_assert_eq!(report.disparate_impact.verdict, Verdict::Undefined);
            }
        }
    }

    #[test]
    fn metrics_are_deterministic(records in prop::collection::vec(labeled_record(), 0..200)) {
        let first = compute_group_metrics(&records, &groups());
        let second = compute_group_metrics(&records, &groups());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn stricter_filter_never_keeps_more(
        records in prop::collection::vec(audit_record(), 0..100),
        window in 0i64..30,
    ) {
        let base = RecordFilter::default();
        let strict = base.clone().with_window(window).exclude_charge("M");
        let (loose, loose_stats) = base.apply(records.clone());
        let (tight, tight_stats) = strict.apply(records);
        prop_assert!(tight.len() <= loose.len());
        prop_assert!(tight.iter().all(|r| loose.contains(r)));
        prop_assert_eq!(loose_stats.rows_kept + loose_stats.rows_dropped(), loose_stats.rows_read);
        prop_assert_eq!(tight_stats.rows_kept + tight_stats.rows_dropped(), tight_stats.rows_read);
    }
}
