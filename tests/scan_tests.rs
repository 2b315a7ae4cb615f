//! End-to-end scans against loopback listeners.

use bannerscan::scanner::{run_scan, scan, ScanConfig};
use bannerscan::{Port, PortRange};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};

const LOCALHOST: &str = "127.0.0.1";

fn port(n: u16) -> Port {
    Port::new(n).unwrap()
}

/// Listener that greets every connection with `greeting`.
async fn greeting_listener(greeting: &'static [u8]) -> Port {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let local = port(listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = socket.write_all(greeting).await;
                let mut sink = [0u8; 64];
                let _ = socket.read(&mut sink).await;
            });
        }
    });
    local
}

/// Listener that accepts and then never says anything.
async fn silent_listener() -> Port {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let local = port(listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    local
}

/// A port that was free a moment ago and has nothing bound now.
async fn unused_port() -> Port {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let local = port(listener.local_addr().unwrap().port());
    drop(listener);
    local
}

/// Bind `port` on loopback without listening, so connects to it are refused.
fn hold_closed(port: u16) -> Option<TcpSocket> {
    let socket = TcpSocket::new_v4().ok()?;
    socket.bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).ok()?;
    Some(socket)
}

#[tokio::test]
async fn ssh_banner_is_identified() {
    let p = greeting_listener(b"SSH-2.0-OpenSSH_8.9\r\n").await;

    let results = scan(LOCALHOST, p, p, Duration::from_secs(2)).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.port, p);
    assert!(result.is_open);
    assert_eq!(result.service, "SSH");
    assert_eq!(result.version, "2.0-OpenSSH_8.9");
    assert_eq!(result.banner, "SSH-2.0-OpenSSH_8.9");
}

#[tokio::test]
async fn http_server_header_is_identified() {
    let p = greeting_listener(b"HTTP/1.0 200 OK Server: nginx/1.18.0\r\n").await;

    let results = scan(LOCALHOST, p, p, Duration::from_secs(2)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].service, "HTTP");
    assert_eq!(results[0].version, "nginx/1.18.0");
}

#[tokio::test]
async fn closed_port_is_absent() {
    let p = unused_port().await;

    let results = scan(LOCALHOST, p, p, Duration::from_millis(300)).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn silent_open_port_has_no_detail() {
    let p = silent_listener().await;

    let start = Instant::now();
    let results = scan(LOCALHOST, p, p, Duration::from_millis(300)).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.is_open);
    assert_eq!(result.service, "Unknown");
    assert_eq!(result.banner, "");
    assert_eq!(result.version, "Unknown");
    // One probe plus one banner read, each bounded by the timeout.
    assert!(start.elapsed() < Duration::from_millis(300 * 2 + 700));
}

#[tokio::test]
async fn listener_found_exactly_once_in_range() {
    let p = greeting_listener(b"220 ready\r\n").await;
    let start = p.as_u16().saturating_sub(100).max(1);
    let end = p.as_u16().saturating_add(100);

    let results = scan(LOCALHOST, port(start), port(end), Duration::from_millis(300)).await;

    let hits = results.iter().filter(|r| r.port == p).count();
    assert_eq!(hits, 1);
    assert!(results.iter().all(|r| r.is_open));
    assert!(results
        .iter()
        .all(|r| r.port.as_u16() >= start && r.port.as_u16() <= end));
}

#[tokio::test]
async fn range_of_closed_ports_yields_only_listener() {
    for _ in 0..20 {
        let p = greeting_listener(b"220 ready\r\n").await;
        let start = p.as_u16().saturating_sub(4).max(1);
        let end = p.as_u16().saturating_add(4);

        // Retry with a new listener if a neighbour is already taken.
        let held: Option<Vec<TcpSocket>> = (start..=end)
            .filter(|&n| n != p.as_u16())
            .map(hold_closed)
            .collect();
        let Some(_held) = held else {
            continue;
        };

        let results = scan(LOCALHOST, port(start), port(end), Duration::from_millis(300)).await;

        let found: Vec<Port> = results.iter().map(|r| r.port).collect();
        assert_eq!(found, vec![p]);
        return;
    }
    panic!("no window of free ports around a listener");
}

#[tokio::test]
async fn run_scan_reports_counts() {
    let open = greeting_listener(b"+OK POP3 ready\r\n").await;
    let closed = unused_port().await;
    let (low, high) = if open < closed { (open, closed) } else { (closed, open) };
    let ports = PortRange::new(low, high).unwrap();

    let report = run_scan(
        ScanConfig::new(LOCALHOST, ports)
            .with_timeout(Duration::from_millis(300))
            .with_concurrency(64),
    )
    .await;

    assert_eq!(report.ports_scanned, ports.len());
    assert_eq!(report.open_ports, report.results.len());
    assert!(report.results.iter().any(|r| r.port == open));
    assert!(report.results.iter().all(|r| r.port != closed));
    assert_eq!(report.start_port, low);
    assert_eq!(report.end_port, high);
    assert_eq!(report.resolved, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
}
