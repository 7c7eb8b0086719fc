use anyhow::Result;
use tracing::info;

use crate::cascade::Cascade;
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::pool;

pub struct Stage2Cascade;

impl Stage2Cascade {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Cascade {
    fn name(&self) -> &'static str {
        "stage2_cascade"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cascade = Cascade::new();
        let records = &ctx.records;
        let outcomes = pool::install(ctx.threads, || cascade.validate_batch(records));
        info!(outcomes = outcomes.len(), "cascade_ready");
        ctx.outcomes = outcomes;
        Ok(())
    }
}
