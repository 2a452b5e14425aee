//! Server address resolution for NT4 clients

use crate::domain::config::ServerConfig;

/// Candidate hosts for the configured server, in connection order.
///
/// An explicit address wins. A team number expands to the robot's static
/// field address, its mDNS names and the USB tether address.
pub fn candidate_hosts(config: &ServerConfig) -> Vec<String> {
    if let Some(address) = config.address.as_deref().filter(|a| !a.trim().is_empty()) {
        return vec![address.trim().to_string()];
    }
    match config.team {
        Some(team) => team_hosts(team),
        None => vec!["127.0.0.1".to_string()],
    }
}

/// Hosts a roboRIO for `team` may be reachable at
pub fn team_hosts(team: u16) -> Vec<String> {
    vec![
        format!("10.{}.{}.2", team / 100, team % 100),
        format!("roborio-{team}-frc.local"),
        format!("roborio-{team}-frc.lan"),
        format!("roborio-{team}-frc.frc-field.local"),
        "172.22.11.2".to_string(),
    ]
}

/// WebSocket URL for one candidate host
pub fn server_url(host: &str, port: u16, client_name: &str) -> String {
    format!("ws://{host}:{port}/nt/{client_name}")
}
