//! Configuration for the transport layer.

use std::time::Duration;

/// Configuration for the transport layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// The signaling WebSocket endpoint, e.g. `ws://127.0.0.1:40102`.
    /// Unset until `connect(url)` supplies one.
    pub signaling_url: Option<String>,
    /// Largest packet the data channel carries, derived from its MTU.
    pub max_packet_size: usize,
    /// How often the check-in timer fires.
    pub check_in_period: Duration,
    /// How long a node may stay silent before it is killed.
    pub silent_node_timeout: Duration,
    /// Minimum quiet time between a disconnect and the next connect to the
    /// same host, letting the previous peer connections tear down.
    pub reconnect_min_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signaling_url: None,
            max_packet_size: 1492,
            check_in_period: Duration::from_millis(1000),
            silent_node_timeout: Duration::from_millis(2000),
            reconnect_min_delay: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Defaults with `SKYLOFT_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SKYLOFT_SIGNALING_SOCKET_URL") {
            config.signaling_url = Some(url);
        }
        if let Some(size) = env_number("SKYLOFT_MAX_PACKET_SIZE") {
            config.max_packet_size = size as usize;
        }
        if let Some(period) = env_number("SKYLOFT_CHECK_IN_PERIOD_MS") {
            config.check_in_period = Duration::from_millis(period);
        }
        if let Some(timeout) = env_number("SKYLOFT_SILENT_NODE_TIMEOUT_MS") {
            config.silent_node_timeout = Duration::from_millis(timeout);
        }
        if let Some(delay) = env_number("SKYLOFT_RECONNECT_MIN_DELAY_MS") {
            config.reconnect_min_delay = Duration::from_millis(delay);
        }
        config
    }
}

fn env_number(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.signaling_url, None);
        assert_eq!(config.max_packet_size, 1492);
        assert_eq!(config.check_in_period, Duration::from_millis(1000));
        assert_eq!(config.silent_node_timeout, Duration::from_millis(2000));
        assert_eq!(config.reconnect_min_delay, Duration::from_millis(500));
    }

    #[test]
    #[serial]
    fn environment_overrides() {
        std::env::set_var("SKYLOFT_SIGNALING_SOCKET_URL", "ws://example.test:40102");
        std::env::set_var("SKYLOFT_CHECK_IN_PERIOD_MS", "250");
        std::env::set_var("SKYLOFT_MAX_PACKET_SIZE", "not a number");

        let config = Config::from_env();
        assert_eq!(config.signaling_url.as_deref(), Some("ws://example.test:40102"));
        assert_eq!(config.check_in_period, Duration::from_millis(250));
        // Unparseable values fall back to the default.
        assert_eq!(config.max_packet_size, 1492);

        std::env::remove_var("SKYLOFT_SIGNALING_SOCKET_URL");
        std::env::remove_var("SKYLOFT_CHECK_IN_PERIOD_MS");
        std::env::remove_var("SKYLOFT_MAX_PACKET_SIZE");
    }
}
