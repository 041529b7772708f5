use crate::command::Command;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to orbit daemon at {}: {source}. Is orbit running?", .path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn connect(socket: &Path) -> Result<UnixStream, ClientError> {
    UnixStream::connect(socket).map_err(|source| ClientError::Connect {
        path: socket.to_path_buf(),
        source,
    })
}

pub fn send_command(socket: &Path, command: &Command) -> Result<(), ClientError> {
    let mut stream = connect(socket)?;
    writeln!(stream, "{}", command)?;
    Ok(())
}

/// Asks the daemon for its latest frame and returns the reply lines.
pub fn query(socket: &Path) -> Result<Vec<String>, ClientError> {
    let mut stream = connect(socket)?;
    writeln!(stream, "{}", Command::Query)?;
    read_reply(BufReader::new(stream))
}

fn read_reply(reader: impl BufRead) -> Result<Vec<String>, ClientError> {
    let mut reply = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        reply.push(line);
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_reply_stops_at_blank_line() {
        let raw = "0 1.000 0.000\nangle 0.000000 mode manual\n\nleftover\n";
        let reply = read_reply(raw.as_bytes()).unwrap();
        assert_eq!(reply, vec!["0 1.000 0.000", "angle 0.000000 mode manual"]);
    }

    #[test]
    fn test_missing_daemon() {
        let err = send_command(Path::new("/nonexistent/orbit.sock"), &Command::Query).unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }));
        assert!(err.to_string().contains("/nonexistent/orbit.sock"));
    }
}
