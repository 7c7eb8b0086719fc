use kira_biotriage::cascade::Cascade;
use kira_biotriage::ctx::{Ctx, SearchOutcome};
use kira_biotriage::io::summary::{format_search_summary, format_summary};
use kira_biotriage::metrics::CascadeStats;
use kira_biotriage::model::{BiomarkerReading, GroundTruth, PatientDescriptor, PatientRecord};
use kira_biotriage::search::{Dataset, LabeledRecord, ThresholdSearch, compare_with_baseline};
use kira_biotriage::thresholds::ThresholdConfiguration;

fn ctx() -> Ctx {
    Ctx::new(
        std::path::PathBuf::from("input"),
        std::path::PathBuf::from("out"),
        false,
        false,
        "0.0.0-test",
    )
}

#[test]
fn summary_format() {
    let mut ctx = ctx();
    ctx.input_meta.records = Some(2);
    ctx.input_meta.fasting = Some(2);
    ctx.input_meta.with_conditions = Some(0);
    let records: Vec<PatientRecord> = [("a", 58.0), ("b", 95.0)]
        .iter()
        .map(|(id, g)| PatientRecord {
            patient: PatientDescriptor::healthy(*id, 30, true),
            reading: BiomarkerReading {
                glucose: *g,
                lactate: 1.0,
                unc_glucose: 5.0,
                unc_lactate: 5.0,
            },
            truth: GroundTruth {
                glucose: *g,
                lactate: 1.0,
            },
        })
        .collect();
    ctx.outcomes = Cascade::new().validate_batch(&records);
    ctx.cascade_stats = Some(CascadeStats::from_outcomes(&ctx.outcomes));

    let out = format_summary(&ctx).unwrap();
    assert!(out.starts_with("kira-biotriage v"));
    assert!(out.contains("Input: 2 records, 2 fasting, 0 with conditions"));
    assert!(out.contains("Screening: danger=1 normal=1 retest=0 (100.0% resolved)"));
    assert!(out.contains("Confusion: TP=1 FP=0 TN=1 FN=0"));
    assert!(out.contains("Retest rate: 0.00%"));
}

#[test]
fn summary_requires_stats() {
    assert!(format_summary(&ctx()).is_err());
    assert!(format_search_summary(&ctx()).is_err());
}

#[test]
fn search_summary_lists_ranked_configs() {
    let dataset = Dataset::new(vec![
        LabeledRecord {
            patient: PatientDescriptor::healthy("a", 40, true),
            glucose: 60.0,
            lactate: 1.0,
            is_true_danger: true,
        },
        LabeledRecord {
            patient: PatientDescriptor::healthy("b", 40, true),
            glucose: 130.0,
            lactate: 1.0,
            is_true_danger: false,
        },
    ]);
    let engine = ThresholdSearch::new(dataset);
    let baseline = engine.evaluate(&ThresholdConfiguration::baseline());
    let reference = engine.evaluate(&ThresholdConfiguration::optimized_v1());
    let grid = kira_biotriage::search::SearchGrid::single(&ThresholdConfiguration::baseline())
        .overlay(vec![(3, vec![126.0, 140.0])]);
    let ranked = engine.search(&grid, 0.95);
    let deltas = compare_with_baseline(&baseline, &ranked[0]);

    let mut ctx = ctx();
    ctx.search = Some(SearchOutcome {
        min_sensitivity: 0.95,
        grid_size: grid.len(),
        baseline,
        reference,
        ranked,
        deltas,
    });
    let out = format_search_summary(&ctx).unwrap();
    assert!(out.contains("Baseline: sens=100.00% prec=50.00% spec=0.00%"));
    assert!(out.contains("Optimized v1: sens=100.00% prec=100.00% spec=100.00% far=0.00%"));
    assert!(out.contains("Grid: 2 configurations, 2 with sensitivity >= 0.95"));
    assert!(out.contains("1\t100.00%\t100.00%\t100.00%"));
    assert!(out.contains("glucose_diabetes_fasting=140"));
    assert!(out.contains("2\t100.00%\t50.00%\t0.00%"));
    assert!(out.contains("\tbaseline\n"));
    assert!(out.contains("precision: 50.00% -> 100.00% (+100.0%)"));

    ctx.search.as_mut().unwrap().ranked.clear();
    assert!(format_search_summary(&ctx).unwrap().contains("Best: none"));
}
