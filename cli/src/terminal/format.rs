use camsweep_common::device::DiscoveredDevice;
use camsweep_common::network::mac::UNKNOWN_MAC;
use colored::*;

use crate::terminal::colors;

/// One-line summary used while the sweep is still running.
pub fn found_line(device: &DiscoveredDevice) -> String {
    let mac = device
        .hardware_address
        .map_or_else(|| UNKNOWN_MAC.to_string(), |m| m.to_string());
    let label = device
        .credentials
        .as_ref()
        .map_or("unmatched", |c| c.manufacturer.as_str());

    format!(
        "{}:{} {} {}",
        device.ip.to_string().color(colors::IPV4_ADDR),
        device.port,
        mac.color(colors::MAC_ADDR),
        format!("({label})").color(colors::SEPARATOR)
    )
}

pub fn device_to_key_value_pairs(device: &DiscoveredDevice) -> Vec<(String, ColoredString)> {
    let mut pairs = vec![
        (String::from("IPv4"), device.ip.to_string().color(colors::IPV4_ADDR)),
        (String::from("Port"), device.port.to_string().color(colors::TEXT_DEFAULT)),
        (
            String::from("MAC"),
            device
                .hardware_address
                .map_or_else(|| UNKNOWN_MAC.to_string(), |m| m.to_string())
                .color(colors::MAC_ADDR),
        ),
    ];

    if let Some(creds) = &device.credentials {
        pairs.push((String::from("Vendor"), creds.manufacturer.color(colors::ACCENT)));
        pairs.push((String::from("Login"), creds.username.color(colors::SECRET)));
    }

    if let Some(links) = &device.stream_links {
        pairs.push((String::from("HD"), links.primary.color(colors::LINK)));
        pairs.push((String::from("SD"), links.secondary.color(colors::LINK)));
    }

    pairs.push((
        String::from("Seen"),
        device
            .timestamp
            .format("%H:%M:%S")
            .to_string()
            .color(colors::SEPARATOR),
    ));

    pairs
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
