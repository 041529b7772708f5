use crate::config::{self, Config};
use crate::sys::driver::{Driver, Frame};
use crate::sys::server;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Runs the ring daemon until Ctrl-C: a driver task owning the engine, the
/// gesture socket server, and the config watcher.
pub fn run(config: Config) -> anyhow::Result<()> {
    let engine = config.ring.build()?;
    let rt = Runtime::new()?;

    rt.block_on(async move {
        let (tx, rx) = async_channel::bounded(64);
        let frame = Arc::new(RwLock::new(Frame::capture(&engine)));
        let socket_path = config.driver.socket_path.clone();

        {
            let tx = tx.clone();
            let frame = frame.clone();
            let socket_path = socket_path.clone();
            tokio::spawn(async move {
                server::run_server(&socket_path, tx, frame).await;
            });
        }

        {
            let tx = tx.clone();
            tokio::spawn(async move {
                config::run_async_watcher(tx).await;
            });
        }

        log::info!(
            "Spinning {} items at {} rad/s, {} fps",
            engine.item_count(),
            engine.angular_speed(),
            config.driver.frame_rate
        );
        let driver = Driver::new(engine, frame);

        tokio::select! {
            _ = driver.run(rx, config.driver.frame_interval()) => {}
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                }
            }
        }

        if let Err(e) = fs_err::remove_file(&*socket_path) {
            log::debug!("Socket cleanup: {}", e);
        }
        Ok(())
    })
}
