//! Minimal runtime configuration helpers.
//! Defaults target a stock Home Assistant install on the local network.

use std::time::Duration;
use std::{fs, path::Path};

pub const DEFAULT_HOST: &str = "http://homeassistant.local:8123";
pub const DEFAULT_POLL_SECS: u64 = 30;
pub const DEFAULT_SUBSCRIBE_TYPE: &str = "smart_heating/subscribe";

#[derive(Debug, Clone)]
pub struct Config {
    /// Home-automation origin; the REST and WebSocket paths are derived from it.
    pub host: String,
    /// Long-lived access token.
    pub token: String,
    /// Polling cadence when the push feed is off or unavailable.
    pub poll_interval: Duration,
    pub push_enabled: bool,
    /// WebSocket command that subscribes to area updates.
    pub subscribe_type: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|s| matches!(s.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = match std::env::var("SMART_HEATING_URL") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => DEFAULT_HOST.to_string(),
        };

        // Prefer env var; fallback to token.txt in working directory
        let token = match std::env::var("SMART_HEATING_TOKEN") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                let path = Path::new("token.txt");
                match fs::read_to_string(path) {
                    Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
                    _ => {
                        return Err(
                            "Missing access token: set SMART_HEATING_TOKEN or provide token.txt in working directory"
                                .to_string(),
                        );
                    }
                }
            }
        };

        let poll_secs = match std::env::var("POLL_INTERVAL_SECS") {
            Ok(s) if !s.trim().is_empty() => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| "POLL_INTERVAL_SECS must be a positive integer".to_string())?,
            _ => DEFAULT_POLL_SECS,
        };

        let subscribe_type = std::env::var("PUSH_SUBSCRIBE_TYPE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUBSCRIBE_TYPE.to_string());

        Ok(Config {
            host,
            token,
            poll_interval: Duration::from_secs(poll_secs),
            push_enabled: env_flag("PUSH_ENABLED", true),
            subscribe_type,
        })
    }
}
