//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `infocenter` application.
//!
//! This module centralizes reusable components, such as the domain error type
//! and logging initialisation.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::error::BrokerError;
    use super::logging;
    use serial_test::serial;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    #[serial]
    fn configured_level_applies_without_rust_log() {
        temp_env::with_var_unset("RUST_LOG", || {
            assert_eq!(
                logging::filter("debug").max_level_hint(),
                Some(LevelFilter::DEBUG)
            );
            assert_eq!(
                logging::filter("nonsense").max_level_hint(),
                Some(LevelFilter::INFO)
            );
        });
    }

    #[test]
    #[serial]
    fn rust_log_overrides_configured_level() {
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            assert_eq!(
                logging::filter("warn").max_level_hint(),
                Some(LevelFilter::TRACE)
            );
        });
    }

    #[test]
    #[serial]
    fn init_is_idempotent() {
        logging::init("info");
        logging::init("debug");
    }

    #[test]
    fn broker_error_messages() {
        assert_eq!(BrokerError::MissingTopic.to_string(), "Topic not specified");
    }
}
