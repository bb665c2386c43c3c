use proxyforge_jobs::{JobRunner, LifecycleJob};
use tracing::info;

use crate::di::AppContext;

pub async fn run(ctx: &AppContext, once: bool) -> anyhow::Result<()> {
    let job = LifecycleJob::new(
        ctx.catalog.clone(),
        ctx.reverify_use_case(),
        ctx.cleanup_use_case(),
        ctx.config.lifecycle.batch_size,
        ctx.config.lifecycle.evict_threshold,
        ctx.config.verification.max_concurrency,
    )
    .with_interval(ctx.config.lifecycle.interval_secs);

    if once {
        job.one_shot().await;
        return Ok(());
    }

    info!("starting lifecycle engine loop, press Ctrl+C to stop");
    JobRunner::new().with_lifecycle(job).start().await;
    tokio::signal::ctrl_c().await?;
    Ok(())
}
