use std::path::PathBuf;

use tracing::info;

use crate::di::AppContext;

pub async fn run(ctx: &AppContext, input: PathBuf) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&input)?;

    let import = ctx.import_candidates_use_case();
    let candidates = import.execute(&contents)?;
    info!(count = candidates.len(), path = %input.display(), "loaded candidates");

    let pipeline = ctx.validation_pipeline();
    let report = pipeline.run(candidates).await?;

    println!(
        "candidates={} records_saved={}",
        report.candidates, report.records_saved
    );
    Ok(())
}
