use crate::events::AppEvent;
use crate::sys::server;
use async_channel::Sender;
use std::io;
use std::thread::{self, JoinHandle};
use tokio::runtime::Builder;

/// Socket server and config watcher on their own runtime thread. Both only
/// talk to the UI through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("vitrine-services".into())
        .spawn(move || {
            let rt = match Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("vitrine-io")
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let server = tokio::spawn(server::run_server(tx.clone()));
                let watcher = tokio::spawn(crate::config::run_async_watcher(tx));

                let (server, watcher) = tokio::join!(server, watcher);
                if let Err(e) = server {
                    log::error!("Control server stopped: {}", e);
                }
                if let Err(e) = watcher {
                    log::error!("Config watcher stopped: {}", e);
                }
                log::debug!("Background services finished");
            });
        })
}
