//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use game_protocol::config::{CodecConfig, LoggingConfig, ProtocolConfig, MAX_PACKET_SIZE_CEILING};
use game_protocol::core::field::FieldKind;
use game_protocol::error::ProtocolError;
use game_protocol::protocol::descriptor::PacketDescriptor;
use game_protocol::protocol::dispatcher::Dispatcher;
use game_protocol::protocol::registry::RegistryBuilder;
use std::sync::Arc;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = ProtocolConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_zero_packet_size() {
    let mut config = ProtocolConfig::default();
    config.codec.max_packet_size = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max packet size cannot be 0")));
}

#[test]
fn test_excessive_packet_size() {
    let mut config = ProtocolConfig::default();
    config.codec.max_packet_size = MAX_PACKET_SIZE_CEILING + 1;

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max packet size too large")));
}

#[test]
fn test_string_limit_exceeds_packet_size() {
    let config = CodecConfig {
        max_string_length: 2048,
        max_array_length: 16,
        max_packet_size: 1024,
    };

    let errors = config.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Max string length cannot be larger"));
}

#[test]
fn test_zero_array_length() {
    let mut config = ProtocolConfig::default();
    config.codec.max_array_length = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max array length cannot be 0")));
}

#[test]
fn test_empty_app_name() {
    let config = LoggingConfig {
        app_name: String::new(),
        ..LoggingConfig::default()
    };
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let mut config = ProtocolConfig::default();
    config.logging.app_name = "x".repeat(65);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Application name too long")));
}

#[test]
fn test_multiple_errors_joined() {
    let config = ProtocolConfig::default_with_overrides(|c| {
        c.codec.max_string_length = 0;
        c.codec.max_array_length = 0;
        c.logging.app_name.clear();
    });

    assert_eq!(config.validate().len(), 3);
    match config.validate_strict() {
        Err(ProtocolError::ConfigError(msg)) => {
            assert!(msg.contains("Configuration validation failed"));
            assert!(msg.contains("Max string length cannot be 0"));
            assert!(msg.contains("Application name cannot be empty"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_toml_partial_sections_use_defaults() {
    let config = ProtocolConfig::from_toml(
        r#"
        [codec]
        max_string_length = 256
        max_array_length = 32
        max_packet_size = 4096
        "#,
    )
    .expect("valid toml");

    assert_eq!(config.codec.max_string_length, 256);
    assert_eq!(config.codec.max_packet_size, 4096);
    assert_eq!(config.logging.log_level, Level::INFO);
    assert_eq!(config.logging.app_name, "game-protocol");
}

#[test]
fn test_toml_invalid_log_level() {
    let err = ProtocolConfig::from_toml(
        r#"
        [logging]
        app_name = "server"
        log_level = "loud"
        json_format = false
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ProtocolError::ConfigError(_)));
}

#[test]
fn test_example_config_parses_back() {
    let example = ProtocolConfig::example_config();
    assert!(example.contains("[codec]"));
    assert!(example.contains("[logging]"));

    let parsed = ProtocolConfig::from_toml(&example).expect("example config should parse");
    assert!(parsed.validate().is_empty());
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("protocol.toml");

    let config = ProtocolConfig::default_with_overrides(|c| {
        c.codec.max_string_length = 512;
        c.logging.log_level = Level::DEBUG;
        c.logging.json_format = true;
    });
    config.save_to_file(&path).expect("save");

    let loaded = ProtocolConfig::from_file(&path).expect("load");
    assert_eq!(loaded.codec.max_string_length, 512);
    assert_eq!(loaded.logging.log_level, Level::DEBUG);
    assert!(loaded.logging.json_format);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ProtocolConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ProtocolError::ConfigError(ref msg) if msg.contains("open")));
}

#[test]
fn test_configured_limits_reach_the_dispatcher() {
    let config = ProtocolConfig::default_with_overrides(|c| {
        c.codec.max_string_length = 4;
        c.codec.max_array_length = 16;
        c.codec.max_packet_size = 64;
    });
    assert!(config.validate().is_empty());

    let mut builder = RegistryBuilder::new();
    builder
        .register_packet(
            PacketDescriptor::builder(2, "Chat")
                .field("text", FieldKind::String)
                .build()
                .unwrap(),
        )
        .unwrap();
    let dispatcher = Dispatcher::with_limits(Arc::new(builder.build()), config.codec.limits());

    // Id 2, length 5, "hello": over the string limit.
    let buf = [0x02, 0x05, b'h', b'e', b'l', b'l', b'o'];
    assert!(matches!(
        dispatcher.dispatch(&buf),
        Err(ProtocolError::LengthLimit { len: 5, max: 4 })
    ));

    let big = vec![0u8; 65];
    assert!(matches!(
        dispatcher.dispatch(&big),
        Err(ProtocolError::OversizedPacket(65))
    ));
}

#[test]
fn test_env_overrides() {
    std::env::set_var("GAME_PROTOCOL_MAX_STRING_LENGTH", "128");
    std::env::set_var("GAME_PROTOCOL_LOG_LEVEL", "debug");
    let config = ProtocolConfig::from_env().expect("env config");
    assert_eq!(config.codec.max_string_length, 128);
    assert_eq!(config.logging.log_level, Level::DEBUG);

    std::env::set_var("GAME_PROTOCOL_MAX_STRING_LENGTH", "lots");
    assert!(matches!(
        ProtocolConfig::from_env(),
        Err(ProtocolError::ConfigError(ref msg)) if msg.contains("not a number")
    ));

    std::env::remove_var("GAME_PROTOCOL_MAX_STRING_LENGTH");
    std::env::remove_var("GAME_PROTOCOL_LOG_LEVEL");
}
