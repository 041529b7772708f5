use crate::command::Command;
use crate::events::AppEvent;
use crate::sys::driver::SharedFrame;
use async_channel::Sender;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(socket_path: &Path, tx: Sender<AppEvent>, frame: SharedFrame) {
    // Cleanup old socket if it exists
    if fs_err::metadata(socket_path).is_ok() {
        let _ = fs_err::remove_file(socket_path);
    }

    let listener = match UnixListener::bind(socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening for gestures on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let frame = frame.clone();
                tokio::spawn(async move {
                    let (reader, writer) = stream.into_split();
                    serve_connection(reader, writer, tx, frame).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Reads commands until the peer hangs up or the driver goes away.
pub async fn serve_connection<R, W>(reader: R, mut writer: W, tx: Sender<AppEvent>, frame: SharedFrame)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Query) => {
                let reply = frame.read().render();
                if writer.write_all(reply.as_bytes()).await.is_err() {
                    break;
                }
            }
            Ok(command) => {
                if let Some(event) = command.into_event()
                    && tx.send(event).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::warn!("Ignoring '{}': {}", line, e),
        }
    }
}
