//! Best-effort discovery of the machine's network identity.
//!
//! The tracker server records the client IP and MAC address alongside time
//! entries and screenshots. Both values are advisory: discovery never fails,
//! it just reports `None` for whatever could not be determined.

use std::net::UdpSocket;

/// Local IP and MAC address, as far as they could be discovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetIdentity {
    pub ip: Option<String>,
    pub mac: Option<String>,
}

impl NetIdentity {
    /// Discovers the identity of the interface used for outbound traffic.
    pub fn discover() -> Self {
        let ip = local_ip();
        let mac = local_mac();
        Self { ip, mac }
    }
}

/// Resolves the local address by opening a UDP socket towards a public
/// address. No packet is sent; connect() only selects the route.
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?;
    let ip = addr.ip().to_string();
    if ip == "0.0.0.0" || ip == "127.0.0.1" {
        return None;
    }
    Some(ip)
}

#[cfg(target_os = "linux")]
fn local_mac() -> Option<String> {
    let entries = std::fs::read_dir("/sys/class/net").ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name == "lo" {
            continue;
        }
        let address_path = entry.path().join("address");
        if let Ok(raw) = std::fs::read_to_string(address_path) {
            let mac = raw.trim().to_string();
            if !mac.is_empty() && mac != "00:00:00:00:00:00" {
                return Some(mac);
            }
        }
    }
    None
}

#[cfg(target_os = "macos")]
fn local_mac() -> Option<String> {
    let output = std::process::Command::new("ifconfig").arg("en0").output().ok()?;
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    text.lines()
        .find_map(|line| line.trim().strip_prefix("ether ").map(|m| m.trim().to_string()))
        .filter(|mac| mac != "00:00:00:00:00:00")
}

#[cfg(target_os = "windows")]
fn local_mac() -> Option<String> {
    let output = std::process::Command::new("getmac").args(["/fo", "csv", "/nh"]).output().ok()?;
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    let first = text.lines().next()?;
    let mac = first.split(',').next()?.trim_matches('"').replace('-', ":");
    if mac.is_empty() || mac == "00:00:00:00:00:00" {
        return None;
    }
    Some(mac)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn local_mac() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_never_panics() {
        let identity = NetIdentity::discover();
        if let Some(ip) = identity.ip {
            assert_ne!(ip, "127.0.0.1");
        }
        if let Some(mac) = identity.mac {
            assert_ne!(mac, "00:00:00:00:00:00");
        }
    }
}
