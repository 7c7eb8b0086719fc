use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::records::read_records;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let set = read_records(&ctx.input)?;
        if set.records.is_empty() {
            warn!(input = %ctx.input.display(), "no records in input");
        }

        let mut seen = std::collections::HashSet::new();
        for r in &set.records {
            if !seen.insert(r.patient.id.as_str()) {
                bail!("duplicate patient_id '{}'", r.patient.id);
            }
        }

        let records = set.records.len() as u64;
        let fasting = set.records.iter().filter(|r| r.patient.fasting).count() as u64;
        let with_conditions = set
            .records
            .iter()
            .filter(|r| r.patient.has_risk_conditions())
            .count() as u64;
        let true_danger = set.records.iter().filter(|r| r.truth.is_danger()).count() as u64;

        ctx.input_meta.records = Some(records);
        ctx.input_meta.fasting = Some(fasting);
        ctx.input_meta.with_conditions = Some(with_conditions);
        ctx.input_meta.true_danger = Some(true_danger);

        ctx.report.input_meta.records = ctx.input_meta.records;
        ctx.report.input_meta.fasting = ctx.input_meta.fasting;
        ctx.report.input_meta.with_conditions = ctx.input_meta.with_conditions;
        ctx.report.input_meta.true_danger = ctx.input_meta.true_danger;

        ctx.warnings.extend(set.warnings);
        ctx.records = set.records;
        info!(records, fasting, with_conditions, true_danger, "records_ready");
        Ok(())
    }
}
