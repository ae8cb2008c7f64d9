use super::load_config;
use super::settings::Settings;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.route_prefix, "infocenter");
    assert_eq!(settings.broker.mailbox_capacity, 10);
    assert_eq!(settings.broker.subscription_timeout_secs, 30);
    assert!(!settings.broker.reset_timeout_on_delivery);
    assert_eq!(settings.log.level, "info");
    assert_eq!(settings.server.listen_addr(), "0.0.0.0:8080");
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("INFOCENTER__SERVER__PORT", Some("9100")),
            ("INFOCENTER__BROKER__MAILBOX_CAPACITY", Some("4")),
            ("INFOCENTER__BROKER__RESET_TIMEOUT_ON_DELIVERY", Some("true")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.server.host, "0.0.0.0");
            assert_eq!(cfg.broker.mailbox_capacity, 4);
            assert!(cfg.broker.reset_timeout_on_delivery);
            assert_eq!(cfg.broker.subscription_timeout_secs, 30);
        },
    );
}

#[test]
#[serial]
fn load_config_rejects_zero_mailbox() {
    temp_env::with_var("INFOCENTER__BROKER__MAILBOX_CAPACITY", Some("0"), || {
        let err = load_config().expect_err("zero capacity must be rejected");
        assert!(err.to_string().contains("mailbox_capacity"));
    });
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // load_config reads config/default.* relative to the working directory.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [server]
        host = "127.0.0.1"
        port = 9000
        route_prefix = "/events/"

        [broker]
        subscription_timeout_secs = 5

        [log]
        level = "debug"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.route_prefix, "/events/");
    assert_eq!(cfg.broker.subscription_timeout_secs, 5);
    assert_eq!(cfg.broker.mailbox_capacity, 10);
    assert_eq!(cfg.log.level, "debug");
}
