use std::sync::Arc;

use stream_monitor::config::Config;
use stream_monitor::control::Dispatcher;
use stream_monitor::server::Server;
use stream_monitor::shard::LogKicker;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(LogKicker), cfg.streams));
    let mut server = Server::new(cfg.server.clone(), dispatcher);
    server.bind(&cfg.server.listen_addr).await?;
    server.start()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop();
    server.destroy();

    Ok(())
}
