use proxyforge_domain::Config;
use tracing::info;

pub fn init_logging(config: &Config) {
    let level = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_max_level(level);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }

    info!(level = %config.logging.level, json = config.logging.json, "logging initialized");
}
