//! A one-shot protocol client.

use crate::error::{ServerError, ServerResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{lookup_host, TcpStream};

/// Sends one request line and returns the single response line.
///
/// The line is sent exactly as given (the trailing newline is appended
/// here), so callers compose it with
/// [`REQUEST_DELIMITER`](crate::REQUEST_DELIMITER) themselves.
///
/// # Errors
///
/// Transport failures stay distinguishable for user-facing reporting:
/// [`ServerError::HostUnresolvable`] when the host has no address,
/// [`ServerError::ConnectionRefused`] when the server is not listening,
/// [`ServerError::ConnectionClosed`] when the stream ends before a
/// response line, and [`ServerError::Io`] for other stream failures.
pub async fn request(host: &str, port: u16, line: &str) -> ServerResult<String> {
    let target = format!("{host}:{port}");

    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|_| ServerError::HostUnresolvable {
            host: host.to_owned(),
        })?;
    let addr = addrs.next().ok_or_else(|| ServerError::HostUnresolvable {
        host: host.to_owned(),
    })?;

    let stream = match TcpStream::connect(addr).await {
        Ok(stream) => stream,
        Err(err) if err.kind() == std::io::ErrorKind::ConnectionRefused => {
            return Err(ServerError::ConnectionRefused { addr: target });
        }
        Err(err) => return Err(err.into()),
    };

    let (reader, mut writer) = stream.into_split();
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut response = String::new();
    let bytes = BufReader::new(reader).read_line(&mut response).await?;
    if bytes == 0 {
        return Err(ServerError::ConnectionClosed);
    }

    Ok(response.trim_end_matches(['\r', '\n']).to_owned())
}
