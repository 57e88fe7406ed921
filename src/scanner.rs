/*
 * @file scanner.rs
 * @brief Network scanner collaborator wrapping the nmap binary
 * @date 2026
 *
 * MIT License
 *
 * Copyright (c) 2026 Sentra Project
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Network scanner collaborator.
//!
//! The assistant never implements scanning itself; it shells out to `nmap`
//! and parses the human-readable output into a structured result.

use std::fmt::Write as _;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Port/protocol state observed on a discovered host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortRecord {
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub service: Option<String>,
}

/// One host discovered by a scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostRecord {
    pub addr: String,
    pub hostname: Option<String>,
    pub mac: Option<String>,
    pub ports: Vec<PortRecord>,
}

/// Everything a single scan produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub target: String,
    pub hosts: Vec<HostRecord>,
}

/// Scanner interface the assistant dispatches to.
pub trait Scanner {
    /// Scans the target range (a CIDR string such as "192.168.1.0/24").
    ///
    /// # Errors
    /// Returns an error when the scanner process cannot run or exits
    /// unsuccessfully; the caller absorbs the failure and keeps the loop
    /// alive.
    fn scan(&self, target: &str) -> Result<ScanResult>;
}

/// Default scanner: spawns the `nmap` binary and blocks until it finishes.
///
/// # Details
/// Defaults to a ping scan (`-sn`), matching the assistant's host-discovery
/// use; callers wanting port state can supply their own argument list.
pub struct NmapScanner {
    binary: String,
    args: Vec<String>,
}

impl NmapScanner {
    /// Creates a ping-scan (`-sn`) scanner.
    pub fn new() -> Self {
        Self {
            binary: "nmap".to_string(),
            args: vec!["-sn".to_string()],
        }
    }

    /// Replaces the default argument list (the target is always appended
    /// last).
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl Default for NmapScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for NmapScanner {
    fn scan(&self, target: &str) -> Result<ScanResult> {
        tracing::info!("running {} {} {}", self.binary, self.args.join(" "), target);
        let output = Command::new(&self.binary)
            .args(&self.args)
            .arg(target)
            .output()
            .with_context(|| format!("failed to launch {}", self.binary))?;
        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_scan_output(target, &stdout))
    }
}

/// Parses nmap's normal (human-readable) output.
///
/// # Details
/// Recognizes three line shapes: "Nmap scan report for ..." opens a new host
/// (with or without a reverse-DNS name), "MAC Address: ..." attaches the
/// hardware address to the current host, and "NN/proto state service" rows
/// attach port state. Everything else (banners, latency lines, column
/// headers) is ignored.
pub fn parse_scan_output(target: &str, stdout: &str) -> ScanResult {
    let mut result = ScanResult {
        target: target.to_string(),
        hosts: Vec::new(),
    };

    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Nmap scan report for ") {
            result.hosts.push(parse_host_line(rest));
        } else if let Some(rest) = line.strip_prefix("MAC Address: ") {
            if let Some(host) = result.hosts.last_mut() {
                let mac = rest.split_whitespace().next().unwrap_or(rest);
                host.mac = Some(mac.to_string());
            }
        } else if let Some(port) = parse_port_line(line) {
            if let Some(host) = result.hosts.last_mut() {
                host.ports.push(port);
            }
        }
    }

    result
}

/// Parses "router.lan (192.168.1.1)" or a bare "192.168.1.7".
fn parse_host_line(rest: &str) -> HostRecord {
    if let Some((name, addr)) = rest.rsplit_once(" (") {
        if let Some(addr) = addr.strip_suffix(')') {
            return HostRecord {
                addr: addr.to_string(),
                hostname: Some(name.to_string()),
                ..HostRecord::default()
            };
        }
    }
    HostRecord {
        addr: rest.to_string(),
        ..HostRecord::default()
    }
}

/// Parses a "22/tcp open ssh" row; returns None for anything else.
fn parse_port_line(line: &str) -> Option<PortRecord> {
    let mut fields = line.split_whitespace();
    let (port, protocol) = fields.next()?.split_once('/')?;
    let port = port.parse::<u16>().ok()?;
    let state = fields.next()?.to_string();
    let service = fields.next().map(str::to_string);
    Some(PortRecord {
        port,
        protocol: protocol.to_string(),
        state,
        service,
    })
}

/// Renders the printed scan report block.
///
/// # Returns
/// A multi-line report listing each host (with hostname and MAC when known)
/// followed by any port/protocol state grouped per protocol.
pub fn render_report(result: &ScanResult) -> String {
    let mut report = String::from("\nScan Report:\n");
    let _ = writeln!(report, "Target: {}", result.target);
    if result.hosts.is_empty() {
        report.push_str("No hosts found.\n");
        return report;
    }
    for host in &result.hosts {
        let _ = write!(report, "Host: {}", host.addr);
        if let Some(hostname) = &host.hostname {
            let _ = write!(report, " ({})", hostname);
        }
        if let Some(mac) = &host.mac {
            let _ = write!(report, " - MAC: {}", mac);
        }
        report.push('\n');

        let mut current_proto: Option<&str> = None;
        for port in &host.ports {
            if current_proto != Some(port.protocol.as_str()) {
                let _ = writeln!(report, "Protocol: {}", port.protocol);
                current_proto = Some(port.protocol.as_str());
            }
            let _ = writeln!(report, "Port: {}, State: {}", port.port, port.state);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const PING_SCAN: &str = "\
Starting Nmap 7.94 ( https://nmap.org ) at 2026-01-10 09:00 UTC
Nmap scan report for router.lan (192.168.1.1)
Host is up (0.0010s latency).
MAC Address: AA:BB:CC:DD:EE:FF (Acme Networks)
Nmap scan report for 192.168.1.7
Host is up (0.020s latency).
Nmap done: 256 IP addresses (2 hosts up) scanned in 2.35 seconds
";

    const PORT_SCAN: &str = "\
Nmap scan report for 10.0.0.5
Host is up.
PORT   STATE SERVICE
22/tcp open  ssh
80/tcp open  http
53/udp open  domain
";

    #[test]
    fn parses_hosts_with_and_without_names() {
        let result = parse_scan_output("192.168.1.0/24", PING_SCAN);
        assert_eq!(result.target, "192.168.1.0/24");
        assert_eq!(result.hosts.len(), 2);

        let first = &result.hosts[0];
        assert_eq!(first.addr, "192.168.1.1");
        assert_eq!(first.hostname.as_deref(), Some("router.lan"));
        assert_eq!(first.mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));

        let second = &result.hosts[1];
        assert_eq!(second.addr, "192.168.1.7");
        assert_eq!(second.hostname, None);
        assert_eq!(second.mac, None);
    }

    #[test]
    fn parses_port_state_and_skips_the_column_header() {
        let result = parse_scan_output("10.0.0.5", PORT_SCAN);
        assert_eq!(result.hosts.len(), 1);
        let ports = &result.hosts[0].ports;
        assert_eq!(ports.len(), 3);
        assert_eq!(ports[0].port, 22);
        assert_eq!(ports[0].protocol, "tcp");
        assert_eq!(ports[0].state, "open");
        assert_eq!(ports[0].service.as_deref(), Some("ssh"));
        assert_eq!(ports[2].protocol, "udp");
    }

    #[test]
    fn report_lists_hosts_and_grouped_protocols() {
        let result = parse_scan_output("10.0.0.5", PORT_SCAN);
        let report = render_report(&result);
        assert!(report.contains("Scan Report:"));
        assert!(report.contains("Host: 10.0.0.5"));
        assert!(report.contains("Protocol: tcp"));
        assert!(report.contains("Port: 22, State: open"));
        assert!(report.contains("Protocol: udp"));
    }

    #[test]
    fn report_handles_an_empty_scan() {
        let result = parse_scan_output("192.168.5.0/24", "Nmap done: 256 IP addresses (0 hosts up)");
        let report = render_report(&result);
        assert!(report.contains("No hosts found."));
    }

    #[test]
    fn report_includes_mac_when_present() {
        let result = parse_scan_output("192.168.1.0/24", PING_SCAN);
        let report = render_report(&result);
        assert!(report.contains("Host: 192.168.1.1 (router.lan) - MAC: AA:BB:CC:DD:EE:FF"));
    }
}
