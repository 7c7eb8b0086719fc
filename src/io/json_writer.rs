use anyhow::Result;

use crate::cascade::CascadeOutcome;
use crate::ctx::{Ctx, SearchOutcome};
use crate::metrics::{CascadeStats, ConfusionMatrix};
use crate::schema::v1::{
    BioTriageV1, CascadeSection, Confusion, InputMeta, MetricDelta, OutcomeRow, Rates,
    SearchEntry, SearchSection, StageCounts,
};
use crate::search::SearchResult;
use crate::thresholds::ThresholdConfiguration;

pub fn build_report(ctx: &Ctx) -> Result<BioTriageV1> {
    let input_meta = InputMeta {
        records: ctx.input_meta.records,
        fasting: ctx.input_meta.fasting,
        with_conditions: ctx.input_meta.with_conditions,
        true_danger: ctx.input_meta.true_danger,
    };

    let cascade = ctx
        .cascade_stats
        .as_ref()
        .map(|stats| cascade_section(ctx, stats));
    let search = ctx
        .search
        .as_ref()
        .map(|outcome| search_section(outcome, ctx.top_n));

    Ok(BioTriageV1 {
        tool: "kira-biotriage".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        cascade,
        search,
    })
}

fn cascade_section(ctx: &Ctx, stats: &CascadeStats) -> CascadeSection {
    let per_patient_tsv_path = if ctx.write_tsv {
        ctx.output
            .tsv_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
    } else {
        None
    };

    CascadeSection {
        screening: StageCounts {
            processed: stats.total,
            danger: stats.screening_danger,
            normal: stats.screening_normal,
            forwarded: stats.screening_retest,
        },
        confirmation: StageCounts {
            processed: stats.confirmation_processed,
            danger: stats.confirmation_danger,
            normal: stats.confirmation_normal,
            forwarded: stats.confirmation_expert,
        },
        review_processed: stats.review_processed,
        confusion: confusion(&stats.confusion),
        rates: rates_from_matrix(&stats.confusion),
        retest_rate: stats.retest_rate(),
        expert_review_rate: stats.expert_review_rate(),
        per_patient_tsv_path,
        per_patient: ctx.outcomes.iter().map(outcome_row).collect(),
    }
}

fn outcome_row(outcome: &CascadeOutcome) -> OutcomeRow {
    let last = outcome.last_verdict();
    OutcomeRow {
        patient_id: outcome.patient_id.clone(),
        final_decision: outcome.final_decision.as_str().to_string(),
        final_confidence: outcome.final_confidence,
        stages_executed: outcome.stages_executed,
        predicted_danger: outcome.predicted_danger,
        true_danger: outcome.is_true_danger,
        reasons: last.reasons.clone(),
        recommended_action: last.recommended_action.clone(),
    }
}

fn search_section(outcome: &SearchOutcome, top_n: usize) -> SearchSection {
    let baseline_cfg = ThresholdConfiguration::baseline();
    SearchSection {
        min_sensitivity: outcome.min_sensitivity,
        grid_size: outcome.grid_size as u64,
        survivors: outcome.ranked.len() as u64,
        baseline: search_entry(None, &outcome.baseline, &baseline_cfg),
        reference: search_entry(None, &outcome.reference, &baseline_cfg),
        top: outcome
            .ranked
            .iter()
            .take(top_n)
            .enumerate()
            .map(|(i, r)| search_entry(Some(i as u64 + 1), r, &baseline_cfg))
            .collect(),
        deltas: outcome
            .deltas
            .iter()
            .map(|d| MetricDelta {
                metric: d.metric.to_string(),
                baseline: d.baseline,
                best: d.best,
                improvement: d.improvement,
            })
            .collect(),
        recommended: outcome.best().map(|b| b.config),
    }
}

fn search_entry(
    rank: Option<u64>,
    result: &SearchResult,
    baseline: &ThresholdConfiguration,
) -> SearchEntry {
    SearchEntry {
        rank,
        config: result.config,
        rates: Rates {
            sensitivity: result.sensitivity,
            specificity: result.specificity,
            precision: result.precision,
            false_alarm_rate: result.false_alarm_rate,
            accuracy: result.accuracy,
            f1_score: result.f1_score,
        },
        emergency_count: result.emergency_count,
        changes: result.config.changes_from(baseline),
    }
}

fn confusion(m: &ConfusionMatrix) -> Confusion {
    Confusion {
        tp: m.tp,
        fp: m.fp,
        tn: m.tn,
        fn_: m.fn_,
    }
}

fn rates_from_matrix(m: &ConfusionMatrix) -> Rates {
    Rates {
        sensitivity: m.sensitivity(),
        specificity: m.specificity(),
        precision: m.precision(),
        false_alarm_rate: m.false_alarm_rate(),
        accuracy: m.accuracy(),
        f1_score: m.f1(),
    }
}
