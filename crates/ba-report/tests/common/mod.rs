//! Shared summary fixture for report integration tests.

use ba_common::{
    AuditSummary, ConfusionMatrix, DisparityReport, FilterStats, GroupDistribution, GroupMetrics,
    PolicyEcho, RatioCheck, Threshold, SCHEMA_VERSION,
};
use ba_math::guarded_ratio;
use chrono::{TimeZone, Utc};

/// Two groups, the second with an undefined FPR when `degenerate` is set.
pub fn summary(protected: &str, reference: &str, degenerate: bool) -> AuditSummary {
    let a = GroupMetrics::from_confusion(
        protected,
        ConfusionMatrix {
            tp: 40,
            fp: 10,
            tn: 40,
            fn_: 10,
        },
    );
    let b_matrix = if degenerate {
        ConfusionMatrix {
            tp: 12,
            fp: 0,
            tn: 0,
            fn_: 8,
        }
    } else {
        ConfusionMatrix {
            tp: 10,
            fp: 10,
            tn: 70,
            fn_: 10,
        }
    };
    let b = GroupMetrics::from_confusion(reference, b_matrix);

    let mut da = GroupDistribution::new(protected);
    let mut db = GroupDistribution::new(reference);
    for score in 1..=10u8 {
        for _ in 0..score {
            da.record(score, score >= 5);
        }
        db.record(11 - score, score % 3 == 0);
    }

    let band = Threshold::Within {
        low: 0.8,
        high: 1.25,
    };
    AuditSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        generator_version: "0.1.0".to_string(),
        input: "compas-scores-two-years.csv".to_string(),
        filter: FilterStats {
            rows_read: 250,
            rows_kept: 200,
            dropped_screening_window: 30,
            dropped_unknown_recidivism: 10,
            dropped_excluded_charge: 7,
            dropped_missing_score_text: 3,
        },
        policy: PolicyEcho {
            high_risk_threshold: 5,
            screening_window_days: 30,
            disparate_impact_threshold: 0.8,
            error_rate_parity_band: (0.8, 1.25),
            group_column: "race".to_string(),
        },
        disparity: DisparityReport {
            protected_group: protected.to_string(),
            reference_group: reference.to_string(),
            disparate_impact: RatioCheck::evaluate(
                guarded_ratio(&a.selection_rate, &b.selection_rate).into(),
                Threshold::AtLeast { min: 0.8 },
            ),
            fpr_ratio: RatioCheck::evaluate(
                guarded_ratio(&a.false_positive_rate, &b.false_positive_rate).into(),
                band,
            ),
            fnr_ratio: RatioCheck::evaluate(
                guarded_ratio(&b.false_negative_rate, &a.false_negative_rate).into(),
                band,
            ),
        },
        metrics: vec![a, b],
        distributions: vec![da, db],
    }
}
