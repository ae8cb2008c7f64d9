mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{BrokerSettings, LogSettings, ServerSettings, Settings};

/// Loads the configuration from the default file and environment variables.
///
/// Sources, lowest precedence first: built-in defaults, `config/default.*`
/// (optional), then `INFOCENTER__SECTION__KEY` environment variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("INFOCENTER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    let settings = merge(partial, Settings::default());
    validate(&settings)?;
    Ok(settings)
}

fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let server = partial.server;
    let broker = partial.broker;
    let log = partial.log;

    Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            route_prefix: server
                .as_ref()
                .and_then(|s| s.route_prefix.clone())
                .unwrap_or(default.server.route_prefix),
        },
        broker: BrokerSettings {
            mailbox_capacity: broker
                .as_ref()
                .and_then(|b| b.mailbox_capacity)
                .unwrap_or(default.broker.mailbox_capacity),
            subscription_timeout_secs: broker
                .as_ref()
                .and_then(|b| b.subscription_timeout_secs)
                .unwrap_or(default.broker.subscription_timeout_secs),
            reset_timeout_on_delivery: broker
                .as_ref()
                .and_then(|b| b.reset_timeout_on_delivery)
                .unwrap_or(default.broker.reset_timeout_on_delivery),
            max_message_bytes: broker
                .as_ref()
                .and_then(|b| b.max_message_bytes)
                .unwrap_or(default.broker.max_message_bytes),
        },
        log: LogSettings {
            level: log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    }
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.broker.mailbox_capacity == 0 {
        return Err(ConfigError::Message(
            "broker.mailbox_capacity must be greater than zero".to_string(),
        ));
    }
    if settings.broker.subscription_timeout_secs == 0 {
        return Err(ConfigError::Message(
            "broker.subscription_timeout_secs must be greater than zero".to_string(),
        ));
    }
    if settings.server.route_prefix.trim_matches('/').is_empty() {
        return Err(ConfigError::Message(
            "server.route_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
