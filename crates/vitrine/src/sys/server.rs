use crate::events::AppEvent;
use async_channel::Sender;
use cardslide::{ControlCommand, SOCKET_PATH};
use fs_err as fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

pub async fn run_server(tx: Sender<AppEvent>) {
    // stale socket from a previous run
    if fs::metadata(SOCKET_PATH).is_ok()
        && let Err(e) = fs::remove_file(SOCKET_PATH)
    {
        log::warn!("Could not remove stale socket: {}", e);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", SOCKET_PATH, e);
            return;
        }
    };
    log::info!("Listening for slider commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_connection(stream, tx.clone()));
            }
            Err(e) => log::error!("Failed to accept connection: {}", e),
        }
    }
}

async fn handle_connection(stream: UnixStream, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(event) = parse_line(&line)
                    && tx.send(event).await.is_err()
                {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::debug!("Control connection dropped: {}", e);
                break;
            }
        }
    }
}

fn parse_line(line: &str) -> Option<AppEvent> {
    if line.trim().is_empty() {
        return None;
    }
    match line.parse::<ControlCommand>() {
        Ok(command) => Some(AppEvent::Control(command)),
        Err(e) => {
            log::warn!("Ignoring control line '{}': {}", line.trim(), e);
            None
        }
    }
}
