//! Configuration for consensus-codec
//!
//! Codec operations are pure functions; configuration only bounds them
//! (nesting depth), chooses textual formatting, and locates reference
//! fixtures. Settings can be built in code, deserialized from JSON, or read
//! from environment variables. There is no global instance: callers pass the
//! config they want.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::PathBuf;

/// Resource limits applied while decoding untrusted input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecLimits {
    /// Maximum number of nested composite levels (containers, vectors, lists)
    /// below the top-level record. Schemas are acyclic so this only guards
    /// against pathological schema definitions.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_nesting_depth() -> usize {
    32
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

/// Textual output formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextFormatConfig {
    /// Pretty-print with indentation instead of the compact canonical form.
    /// Round-trip byte equality only holds for the compact form.
    #[serde(default)]
    pub pretty: bool,
}

/// Location of external reference fixtures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Root of an unpacked consensus-spec-tests checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_tests_dir: Option<PathBuf>,

    /// Preset directory under `tests/` (`mainnet` or `minimal`)
    #[serde(default = "default_preset")]
    pub preset: String,
}

fn default_preset() -> String {
    "mainnet".to_string()
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            spec_tests_dir: None,
            preset: default_preset(),
        }
    }
}

impl FixtureConfig {
    /// `<dir>/tests/<preset>/<fork>/ssz_static/<type_name>/ssz_random`, if a dir is set.
    pub fn ssz_static_dir(&self, fork: &str, type_name: &str) -> Option<PathBuf> {
        self.spec_tests_dir.as_ref().map(|dir| {
            dir.join("tests")
                .join(&self.preset)
                .join(fork)
                .join("ssz_static")
                .join(type_name)
                .join("ssz_random")
        })
    }
}

/// Complete codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CodecConfig {
    #[serde(default)]
    pub limits: CodecLimits,

    #[serde(default)]
    pub text: TextFormatConfig,

    #[serde(default)]
    pub fixtures: FixtureConfig,
}

impl CodecConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// - `CONSENSUS_CODEC_MAX_NESTING_DEPTH`
    /// - `CONSENSUS_CODEC_TEXT_PRETTY`
    /// - `ETH2_SPEC_TESTS_DIR`
    /// - `ETH2_SPEC_TESTS_PRESET`
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONSENSUS_CODEC_MAX_NESTING_DEPTH") {
            if let Ok(depth) = val.parse::<usize>() {
                config.limits.max_nesting_depth = depth;
            }
        }
        if let Ok(val) = std::env::var("CONSENSUS_CODEC_TEXT_PRETTY") {
            if let Ok(pretty) = val.parse::<bool>() {
                config.text.pretty = pretty;
            }
        }
        if let Ok(val) = std::env::var("ETH2_SPEC_TESTS_DIR") {
            if !val.is_empty() {
                config.fixtures.spec_tests_dir = Some(PathBuf::from(val));
            }
        }
        if let Ok(val) = std::env::var("ETH2_SPEC_TESTS_PRESET") {
            if !val.is_empty() {
                config.fixtures.preset = val;
            }
        }

        config
    }

    /// Parse configuration from a JSON document. Missing sections take defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| CodecError::Config(Cow::Owned(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.limits.max_nesting_depth, 32);
        assert!(!config.text.pretty);
        assert_eq!(config.fixtures.preset, "mainnet");
        assert!(config.fixtures.spec_tests_dir.is_none());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = CodecConfig::from_json_str(r#"{"text":{"pretty":true}}"#).unwrap();
        assert!(config.text.pretty);
        assert_eq!(config.limits, CodecLimits::default());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            CodecConfig::from_json_str("{"),
            Err(CodecError::Config(_))
        ));
    }

    #[test]
    fn test_fixture_dir_layout() {
        let fixtures = FixtureConfig {
            spec_tests_dir: Some(PathBuf::from("/specs")),
            preset: "minimal".into(),
        };
        assert_eq!(
            fixtures.ssz_static_dir("phase0", "ForkData").unwrap(),
            PathBuf::from("/specs/tests/minimal/phase0/ssz_static/ForkData/ssz_random")
        );
        assert!(FixtureConfig::default()
            .ssz_static_dir("phase0", "ForkData")
            .is_none());
    }
}
