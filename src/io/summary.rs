use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::metrics::ConfusionMatrix;
use crate::search::SearchResult;
use crate::thresholds::ThresholdConfiguration;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let stats = ctx
        .cascade_stats
        .as_ref()
        .context("cascade stats missing")?;

    let mut out = String::new();
    out.push_str(&format!("kira-biotriage v{}\n", version));
    out.push_str(&format!(
        "Input: {} records, {} fasting, {} with conditions\n",
        ctx.input_meta.records.unwrap_or(0),
        ctx.input_meta.fasting.unwrap_or(0),
        ctx.input_meta.with_conditions.unwrap_or(0)
    ));
    out.push_str(&format!(
        "Screening: danger={} normal={} retest={} ({:.1}% resolved)\n",
        stats.screening_danger,
        stats.screening_normal,
        stats.screening_retest,
        stats.screening_resolution_rate() * 100.0
    ));
    out.push_str(&format!(
        "Confirmation: processed={} danger={} normal={} expert={} ({:.1}% resolved)\n",
        stats.confirmation_processed,
        stats.confirmation_danger,
        stats.confirmation_normal,
        stats.confirmation_expert,
        stats.confirmation_resolution_rate() * 100.0
    ));
    out.push_str(&format!("Expert review: processed={}\n", stats.review_processed));
    out.push_str(&format_confusion(&stats.confusion));
    out.push_str(&format!(
        "Retest rate: {:.2}%  Expert review rate: {:.2}%\n",
        stats.retest_rate() * 100.0,
        stats.expert_review_rate() * 100.0
    ));
    Ok(out)
}

pub fn format_search_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let search = ctx.search.as_ref().context("search results missing")?;
    let baseline_cfg = ThresholdConfiguration::baseline();

    let mut out = String::new();
    out.push_str(&format!("kira-biotriage v{}\n", version));
    out.push_str(&format!(
        "Grid: {} configurations, {} with sensitivity >= {:.2}\n",
        search.grid_size,
        search.ranked.len(),
        search.min_sensitivity
    ));
    out.push_str(&format_profile("Baseline", &search.baseline));
    out.push_str(&format_profile("Optimized v1", &search.reference));

    if search.ranked.is_empty() {
        out.push_str("Best: none\n");
        return Ok(out);
    }

    out.push_str("rank\tsens\tprec\tspec\tf1\tfar\tchanges\n");
    for (i, r) in search.ranked.iter().take(ctx.top_n).enumerate() {
        let changes = r.config.changes_from(&baseline_cfg);
        out.push_str(&format!(
            "{}\t{:.2}%\t{:.2}%\t{:.2}%\t{:.4}\t{:.2}%\t{}\n",
            i + 1,
            r.sensitivity * 100.0,
            r.precision * 100.0,
            r.specificity * 100.0,
            r.f1_score,
            r.false_alarm_rate * 100.0,
            if changes.is_empty() {
                "baseline".to_string()
            } else {
                changes.join(", ")
            }
        ));
    }
    for d in &search.deltas {
        out.push_str(&format!(
            "{}: {:.2}% -> {:.2}% ({:+.1}%)\n",
            d.metric,
            d.baseline * 100.0,
            d.best * 100.0,
            d.improvement * 100.0
        ));
    }
    Ok(out)
}

fn format_profile(label: &str, r: &SearchResult) -> String {
    format!(
        "{}: sens={:.2}% prec={:.2}% spec={:.2}% far={:.2}% f1={:.4}\n",
        label,
        r.sensitivity * 100.0,
        r.precision * 100.0,
        r.specificity * 100.0,
        r.false_alarm_rate * 100.0,
        r.f1_score
    )
}

fn format_confusion(m: &ConfusionMatrix) -> String {
    format!(
        "Confusion: TP={} FP={} TN={} FN={}\nSensitivity: {:.2}%  Specificity: {:.2}%  Precision: {:.2}%  FAR: {:.2}%  Accuracy: {:.2}%\n",
        m.tp,
        m.fp,
        m.tn,
        m.fn_,
        m.sensitivity() * 100.0,
        m.specificity() * 100.0,
        m.precision() * 100.0,
        m.false_alarm_rate() * 100.0,
        m.accuracy() * 100.0
    )
}
