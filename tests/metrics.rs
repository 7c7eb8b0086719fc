use kira_biotriage::cascade::Cascade;
use kira_biotriage::metrics::{CascadeStats, ConfusionMatrix, ratio};
use kira_biotriage::model::{BiomarkerReading, GroundTruth, PatientDescriptor, PatientRecord};

#[test]
fn empty_matrix_rates_are_zero() {
    let m = ConfusionMatrix::default();
    assert_eq!(m.sensitivity(), 0.0);
    assert_eq!(m.specificity(), 0.0);
    assert_eq!(m.precision(), 0.0);
    assert_eq!(m.false_alarm_rate(), 0.0);
    assert_eq!(m.accuracy(), 0.0);
    assert_eq!(m.f1(), 0.0);
    assert_eq!(ratio(3, 0), 3.0);
}

#[test]
fn matrix_records_outcomes() {
    let mut m = ConfusionMatrix::default();
    m.record(true, true);
    m.record(true, false);
    m.record(false, true);
    m.record(false, false);
    m.record(false, false);
    assert_eq!((m.tp, m.fn_, m.fp, m.tn), (1, 1, 1, 2));
    assert_eq!(m.total(), 5);
    assert!((m.sensitivity() - 0.5).abs() < 1e-12);
    assert!((m.specificity() - 2.0 / 3.0).abs() < 1e-12);
    assert!((m.f1() - 0.5).abs() < 1e-12);
}

#[test]
fn confusion_serializes_fn_key() {
    let m = ConfusionMatrix {
        tp: 1,
        fp: 2,
        tn: 3,
        fn_: 4,
    };
    let v = serde_json::to_value(m).unwrap();
    assert_eq!(v["fn"], 4);
}

#[test]
fn cascade_stats_counts_stages() {
    let rec = |id: &str, g: f64| PatientRecord {
        patient: PatientDescriptor::healthy(id, 45, true),
        reading: BiomarkerReading {
            glucose: g,
            lactate: 1.0,
            unc_glucose: 5.0,
            unc_lactate: 5.0,
        },
        truth: GroundTruth {
            glucose: g,
            lactate: 1.0,
        },
    };
    let records = vec![rec("a", 58.0), rec("b", 95.0), rec("c", 118.0), rec("d", 62.0)];
    let stats = CascadeStats::from_outcomes(&Cascade::new().validate_batch(&records));
    assert_eq!(stats.total, 4);
    assert_eq!(stats.screening_danger, 1);
    assert_eq!(stats.screening_normal, 1);
    assert_eq!(stats.screening_retest, 2);
    assert_eq!(stats.confirmation_processed, 2);
    assert_eq!(stats.confirmation_normal, 1);
    assert_eq!(stats.confirmation_expert, 1);
    assert_eq!(stats.review_processed, 1);
    assert_eq!(stats.confusion.tp, 2);
    assert_eq!(stats.confusion.tn, 2);
    assert!((stats.retest_rate() - 0.5).abs() < 1e-12);
    assert!((stats.expert_review_rate() - 0.25).abs() < 1e-12);

    let empty = CascadeStats::from_outcomes(&[]);
    assert_eq!(empty.retest_rate(), 0.0);
    assert_eq!(empty.confirmation_resolution_rate(), 0.0);
}
