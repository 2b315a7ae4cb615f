//! Banner grabbing for TCP services.
//!
//! Opens a fresh connection, sends a small trigger payload chosen by port,
//! and reads a single line back. Many services (binary protocols, TLS-first
//! listeners) never answer with a line; that is reported as an error the
//! scanner swallows, not as a failed scan.

use crate::error::{BannerError, BannerResult};
use crate::types::Port;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read while looking for the end of the first line.
pub const MAX_BANNER_SIZE: u64 = 1024;

/// Minimal request for HTTP(S) ports.
const HTTP_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";

/// Bare line terminator; self-announcing protocols ignore it.
const LINE_PROBE: &[u8] = b"\r\n";

/// Grab the first line a service sends on `host:port`.
///
/// The connect attempt and the read each get `limit`; the read deadline
/// starts once the connection is up. The returned line is trimmed.
pub async fn grab_banner(host: &str, port: Port, limit: Duration) -> BannerResult<String> {
    let stream = match timeout(limit, TcpStream::connect((host, port.as_u16()))).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(BannerError::Connect(e)),
        Err(_) => return Err(BannerError::ConnectTimeout),
    };

    let line = timeout(limit, read_first_line(stream, port))
        .await
        .map_err(|_| BannerError::ReadTimeout)??;

    trace!(host, port = port.as_u16(), banner = %line, "banner received");
    Ok(line)
}

/// Send the trigger for `port` and read up to the first `\n`.
async fn read_first_line(mut stream: TcpStream, port: Port) -> BannerResult<String> {
    stream.write_all(trigger_for(port)).await?;

    let mut reader = BufReader::new(stream.take(MAX_BANNER_SIZE));
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line).await?;

    if line.last() != Some(&b'\n') {
        return Err(BannerError::NoLineTerminator);
    }

    Ok(String::from_utf8_lossy(&line).trim().to_string())
}

/// Pick the trigger payload for a port.
fn trigger_for(port: Port) -> &'static [u8] {
    if is_http_port(port.as_u16()) {
        HTTP_PROBE
    } else {
        LINE_PROBE
    }
}

/// Check if a port is one we treat as HTTP(S).
fn is_http_port(port: u16) -> bool {
    matches!(port, 80 | 443 | 8080 | 8443)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    #[test]
    fn test_is_http_port() {
        assert!(is_http_port(80));
        assert!(is_http_port(443));
        assert!(is_http_port(8080));
        assert!(is_http_port(8443));
        assert!(!is_http_port(22));
        assert!(!is_http_port(8000));
    }

    #[test]
    fn test_trigger_selection() {
        assert_eq!(trigger_for(port(80)), b"HEAD / HTTP/1.0\r\n\r\n");
        assert_eq!(trigger_for(port(22)), b"\r\n");
    }

    async fn serve_once(reply: &'static [u8]) -> (Port, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local = port(listener.local_addr().unwrap().port());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = vec![0u8; 64];
            let n = socket.read(&mut received).await.unwrap_or(0);
            received.truncate(n);
            socket.write_all(reply).await.unwrap();
            received
        });
        (local, handle)
    }

    #[tokio::test]
    async fn test_reads_first_line_and_trims() {
        let (p, server) = serve_once(b"  220 mail.example.com ESMTP\r\n250 more\r\n").await;
        let banner = grab_banner("127.0.0.1", p, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(banner, "220 mail.example.com ESMTP");
        assert_eq!(server.await.unwrap(), b"\r\n");
    }

    #[tokio::test]
    async fn test_close_without_newline_is_error() {
        let (p, _server) = serve_once(b"partial").await;
        let err = grab_banner("127.0.0.1", p, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::NoLineTerminator));
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let p = port(listener.local_addr().unwrap().port());
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let err = grab_banner("127.0.0.1", p, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::ReadTimeout));
    }

    #[tokio::test]
    async fn test_oversized_line_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let p = port(listener.local_addr().unwrap().port());
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let junk = vec![b'A'; MAX_BANNER_SIZE as usize * 2];
            let _ = socket.write_all(&junk).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = grab_banner("127.0.0.1", p, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, BannerError::NoLineTerminator));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let p = port(listener.local_addr().unwrap().port());
        drop(listener);

        let err = grab_banner("127.0.0.1", p, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BannerError::Connect(_) | BannerError::ConnectTimeout
        ));
    }
}
