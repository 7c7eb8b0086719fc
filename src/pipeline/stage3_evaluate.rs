use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::CascadeStats;
use crate::pipeline::Stage;

pub struct Stage3Evaluate;

impl Stage3Evaluate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Evaluate {
    fn name(&self) -> &'static str {
        "stage3_evaluate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let stats = CascadeStats::from_outcomes(&ctx.outcomes);
        info!(
            sensitivity = stats.confusion.sensitivity(),
            precision = stats.confusion.precision(),
            retest_rate = stats.retest_rate(),
            expert_review_rate = stats.expert_review_rate(),
            "cascade_stats_ready"
        );
        ctx.cascade_stats = Some(stats);
        Ok(())
    }
}
