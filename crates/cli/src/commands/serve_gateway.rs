use std::sync::Arc;
use std::time::Duration;

use proxyforge_infrastructure::gateway::GatewayServer;
use tracing::info;

use crate::di::AppContext;

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let pool = ctx.hot_pool();
    pool.clone().spawn_health_monitor(Duration::from_secs(
        ctx.config.rotation.health_check_interval_secs,
    ));

    let server = Arc::new(GatewayServer::new(pool, ctx.config.rotation.strategy));
    let listen_addr: std::net::SocketAddr = ctx.config.rotation.listen_addr.parse()?;

    info!(%listen_addr, "rotating gateway starting");
    server.serve(listen_addr).await?;
    Ok(())
}
