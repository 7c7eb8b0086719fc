use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::{Ctx, SearchOutcome};
use crate::pipeline::Stage;
use crate::search::{Dataset, ThresholdSearch, compare_with_baseline, grid};
use crate::thresholds::ThresholdConfiguration;

pub struct Stage4Search;

impl Stage4Search {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Search {
    fn name(&self) -> &'static str {
        "stage4_search"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !(0.0..=1.0).contains(&ctx.min_sensitivity) {
            bail!(
                "min sensitivity must be within [0, 1], got {}",
                ctx.min_sensitivity
            );
        }
        let grid = grid::load_with_overlay(ctx.grid_path.as_deref())?;
        let dataset = Dataset::from_patient_records(&ctx.records);
        info!(
            records = dataset.len(),
            danger = dataset.danger_count(),
            grid = grid.len(),
            "search_dataset_ready"
        );

        let engine = ThresholdSearch::new(dataset).with_threads(ctx.threads);
        let baseline = engine.evaluate(&ThresholdConfiguration::baseline());
        let reference = engine.evaluate(&ThresholdConfiguration::optimized_v1());
        let ranked = engine.search(&grid, ctx.min_sensitivity);
        let deltas = match ranked.first() {
            Some(best) => compare_with_baseline(&baseline, best),
            None => {
                ctx.warnings.push(format!(
                    "no configuration reached sensitivity >= {:.2}",
                    ctx.min_sensitivity
                ));
                Vec::new()
            }
        };

        ctx.search = Some(SearchOutcome {
            min_sensitivity: ctx.min_sensitivity,
            grid_size: grid.len(),
            baseline,
            reference,
            ranked,
            deltas,
        });
        Ok(())
    }
}
