use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the HTTP server, the broker and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the listen address and the path prefix topics are mounted under.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub route_prefix: String,
}

/// Configuration settings for the broker.
///
/// Controls per-subscriber buffering and the lifetime of a subscription.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Events buffered per subscriber before further deliveries are dropped.
    pub mailbox_capacity: usize,
    pub subscription_timeout_secs: u64,
    /// Turns the subscription timeout into an idle timeout.
    pub reset_timeout_on_delivery: bool,
    pub max_message_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub route_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub mailbox_capacity: Option<usize>,
    pub subscription_timeout_secs: Option<u64>,
    pub reset_timeout_on_delivery: Option<bool>,
    pub max_message_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            broker: BrokerSettings::default(),
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            route_prefix: "infocenter".to_string(),
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            mailbox_capacity: 10,
            subscription_timeout_secs: 30,
            reset_timeout_on_delivery: false,
            max_message_bytes: 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// `host:port` string handed to the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
