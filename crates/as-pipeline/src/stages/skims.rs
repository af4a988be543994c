//! `impute_skims`: the complete zone-pair skim table, read from its cache
//! or imputed from raw and reference skims.

use as_skims::{SkimSources, load_or_impute};

use crate::context::tables;
use crate::{DataContext, PipelineResult, Stage};

pub struct ImputeSkims;

impl Stage for ImputeSkims {
    fn name(&self) -> &'static str {
        "impute_skims"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &[]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[tables::SKIMS]
    }

    fn run(&self, ctx: &mut DataContext) -> PipelineResult<()> {
        let files = &ctx.config.skims;
        let raw_path = ctx.config.data_path(&files.raw);
        let reference_path = ctx.config.data_path(&files.reference);
        let sources = SkimSources {
            raw_path:        &raw_path,
            reference_path:  &reference_path,
            distance_column: &files.distance_column,
        };
        let skims = load_or_impute(&ctx.config.data_path(&files.imputed), &sources, &ctx.config.impute)?;

        let missing = skims.missing_cells();
        if missing > 0 {
            log::warn!("{missing} skim cells remain empty after imputation");
        }
        log::info!("skims: {} zone pairs, modes {:?}", skims.len(), skims.modes());
        ctx.skims = Some(skims);
        Ok(())
    }
}
