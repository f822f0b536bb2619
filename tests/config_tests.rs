//! Configuration module tests
//!
//! Tests for codec configuration loading and its effect on the codec façade.

use consensus_codec::config::{CodecConfig, CodecLimits, FixtureConfig, TextFormatConfig};
use consensus_codec::container::SszContainer;
use consensus_codec::forks::phase0::Checkpoint;
use consensus_codec::{CodecError, ConsensusCodec};

#[test]
fn test_codec_limits_default() {
    let limits = CodecLimits::default();

    assert_eq!(limits.max_nesting_depth, 32);
}

#[test]
fn test_text_format_default_is_compact() {
    let format = TextFormatConfig::default();

    assert!(!format.pretty);
}

#[test]
fn test_fixture_config_default() {
    let fixtures = FixtureConfig::default();

    assert_eq!(fixtures.preset, "mainnet");
    assert!(fixtures.spec_tests_dir.is_none());
}

#[test]
fn test_codec_config_from_env() {
    // Test that from_env() doesn't panic
    // Note: Actual env var testing would require setting/unsetting env vars
    let _config = CodecConfig::from_env();
}

#[test]
fn test_codec_config_from_json() {
    let config = CodecConfig::from_json_str(
        r#"{"limits":{"max_nesting_depth":4},"fixtures":{"spec_tests_dir":"/data/specs","preset":"minimal"}}"#,
    )
    .unwrap();

    assert_eq!(config.limits.max_nesting_depth, 4);
    assert!(!config.text.pretty);
    assert_eq!(config.fixtures.preset, "minimal");
    assert!(config
        .fixtures
        .ssz_static_dir("capella", "Withdrawal")
        .unwrap()
        .ends_with("tests/minimal/capella/ssz_static/Withdrawal/ssz_random"));
}

#[test]
fn test_codec_config_json_round_trip() {
    let mut config = CodecConfig::default();
    config.text.pretty = true;
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(CodecConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_codec_config_rejects_wrong_types() {
    let result = CodecConfig::from_json_str(r#"{"limits":{"max_nesting_depth":"deep"}}"#);
    assert!(matches!(result, Err(CodecError::Config(_))));
}

#[test]
fn test_pretty_config_reaches_codec() {
    let mut config = CodecConfig::default();
    config.text.pretty = true;
    let codec = ConsensusCodec::with_config(config);
    let checkpoint = Checkpoint {
        epoch: 9,
        root: [0x42; 32],
    };
    let text = codec
        .to_text(Checkpoint::schema(), &checkpoint.to_record())
        .unwrap();
    assert!(text.contains("\n  \"epoch\": \"9\""));
    let record = codec.from_text(Checkpoint::schema(), &text).unwrap();
    assert_eq!(Checkpoint::from_record(record).unwrap(), checkpoint);
}
