//! Service identification from port numbers and banners.
//!
//! A static table maps well-known ports to service names. When a banner is
//! available, substring heuristics override the table guess and try to pull
//! out a version string. Banners come from the remote side and are
//! untrusted, so the result is advisory only.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder for an unrecognised service or version.
pub const UNKNOWN: &str = "Unknown";

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(21, "FTP");
    m.insert(22, "SSH");
    m.insert(23, "Telnet");
    m.insert(25, "SMTP");
    m.insert(53, "DNS");
    m.insert(80, "HTTP");
    m.insert(110, "POP3");
    m.insert(143, "IMAP");
    m.insert(443, "HTTPS");
    m.insert(3306, "MySQL");
    m.insert(3389, "RDP");
    m.insert(5432, "PostgreSQL");
    m.insert(5900, "VNC");
    m.insert(6379, "Redis");
    m.insert(8080, "HTTP-Proxy");
    m.insert(8443, "HTTPS-Alt");
    m.insert(11211, "Memcached");
    m.insert(27017, "MongoDB");

    m
});

/// Best-guess identification of the service behind a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub service: String,
    pub version: String,
}

impl Identification {
    fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
        }
    }

    /// Nothing known about the service.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

/// Look up the probable service name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Get the table service name for a port, or "Unknown".
pub fn get_service_description(port: u16) -> &'static str {
    get_service_name(port).unwrap_or(UNKNOWN)
}

/// Classify a port and its banner into a `(service, version)` guess.
///
/// The port table supplies the baseline service. Banner rules are checked in
/// order against the lower-cased banner and the first match wins:
///
/// 1. `ssh` anywhere: service is `SSH`, version is the second
///    whitespace-separated token.
/// 2. `http`, `apache` or `nginx`: service is `HTTPS` on port 443 and `HTTP`
///    otherwise, version is whatever follows the first `Server:`.
pub fn classify(port: u16, banner: &str) -> Identification {
    let lower = banner.to_lowercase();

    if lower.contains("ssh") {
        return Identification::new("SSH", ssh_version(banner).unwrap_or(UNKNOWN));
    }

    if ["http", "apache", "nginx"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        let service = if port == 443 { "HTTPS" } else { "HTTP" };
        return Identification::new(service, server_header(banner).unwrap_or(UNKNOWN));
    }

    Identification::new(get_service_description(port), UNKNOWN)
}

/// Second whitespace-separated token of an SSH banner.
///
/// A bare identification string such as `SSH-2.0-OpenSSH_8.9` is a single
/// token; there the protocol/software part after the `SSH-` prefix is used.
fn ssh_version(banner: &str) -> Option<&str> {
    let mut tokens = banner.split_whitespace();
    let first = tokens.next()?;
    if let Some(second) = tokens.next() {
        return Some(second);
    }

    first
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("ssh-"))
        .and_then(|_| first.get(4..))
        .filter(|rest| !rest.is_empty())
}

/// Trimmed text after the first `Server:` marker (case-sensitive).
fn server_header(banner: &str) -> Option<&str> {
    banner
        .split_once("Server:")
        .map(|(_, rest)| rest.trim())
        .filter(|value| !value.is_empty())
}
