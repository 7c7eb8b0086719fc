use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::thresholds::FIELD_NAMES;

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "patient_id\tstage1\tstage2\tstage3\tfinal_decision\tfinal_confidence\tstages\tpredicted_danger\ttrue_danger"
    )?;
    for o in &ctx.outcomes {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t{}\t{}",
            o.patient_id,
            o.screening.decision.as_str(),
            o.confirmation
                .as_ref()
                .map(|v| v.decision.as_str())
                .unwrap_or("-"),
            o.review
                .as_ref()
                .map(|v| v.decision.as_str())
                .unwrap_or("-"),
            o.final_decision.as_str(),
            o.final_confidence,
            o.stages_executed,
            o.predicted_danger as u8,
            o.is_true_danger as u8,
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_search_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let search = ctx.search.as_ref().context("search results missing")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(
        w,
        "rank\t{}\tsensitivity\tspecificity\tprecision\tfalse_alarm_rate\taccuracy\tf1\temergency_count",
        FIELD_NAMES.join("\t")
    )?;
    for (i, r) in search.ranked.iter().enumerate() {
        let cfg: Vec<String> = r.config.values().iter().map(|v| format!("{}", v)).collect();
        writeln!(
            w,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}",
            i + 1,
            cfg.join("\t"),
            r.sensitivity,
            r.specificity,
            r.precision,
            r.false_alarm_rate,
            r.accuracy,
            r.f1_score,
            r.emergency_count
        )?;
    }
    w.flush()?;
    Ok(())
}
