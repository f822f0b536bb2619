//! # Consensus Codec
//!
//! Binary encoding, hash tree roots and canonical JSON for consensus-layer
//! records, driven by declarative schemas.
//!
//! ## Architecture
//!
//! - [`schema`] describes a record type as an ordered list of field kinds;
//! - [`serialization::binary`] encodes records into the offset-based binary form;
//! - [`merkle`] computes 32-byte hash tree roots with length mixins;
//! - [`serialization::text`] encodes records as `0x` hex and decimal strings;
//! - [`serialization::yaml`] renders the same values as flow-style YAML;
//! - [`forks`] holds schemas and typed structs for representative records.
//!
//! All three codecs consume the same schema and never depend on each other's
//! state.
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation is deterministic and side-effect-free
//! 2. **Validate Then Allocate**: declared maxima are checked before any buffer
//!    is sized from untrusted offsets or counts
//! 3. **Stable Errors**: textual error messages are part of the public contract
//!
//! ## Usage
//!
//! ```rust
//! use consensus_codec::container::SszContainer;
//! use consensus_codec::forks::phase0::Checkpoint;
//!
//! let checkpoint = Checkpoint { epoch: 5, root: [0x11; 32] };
//! let bytes = checkpoint.to_ssz().unwrap();
//! assert_eq!(bytes.len(), 40);
//! assert_eq!(Checkpoint::from_ssz(&bytes).unwrap(), checkpoint);
//!
//! let text = checkpoint.to_json().unwrap();
//! assert!(text.starts_with(r#"{"epoch":"5","root":"0x1111"#));
//! let root = checkpoint.hash_tree_root().unwrap();
//! assert_eq!(root.len(), 32);
//! ```

pub mod config;
pub mod constants;
pub mod container;
pub mod crypto;
pub mod error;
pub mod forks;
pub mod merkle;
pub mod schema;
pub mod serialization;
pub mod types;
pub mod uint;

pub use config::CodecConfig;
pub use error::{CodecError, Result, TextError};
pub use schema::{AbsentPolicy, Field, FieldKind, Schema};
pub use types::{Hash, Record, Value};
pub use uint::U256;

use serialization::{binary, text, yaml};

/// Codec entry points bound to a configuration
///
/// The free functions in [`serialization`] and [`merkle`] use default limits;
/// this struct applies the limits and text formatting of the config it holds.
#[derive(Debug, Clone, Default)]
pub struct ConsensusCodec {
    config: CodecConfig,
}

impl ConsensusCodec {
    /// Create a codec with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with the given configuration
    pub fn with_config(config: CodecConfig) -> Self {
        ConsensusCodec { config }
    }

    /// Create a codec configured from environment variables
    pub fn from_env() -> Self {
        Self::with_config(CodecConfig::from_env())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encoded size of a record
    pub fn size(&self, schema: &Schema, record: &Record) -> Result<usize> {
        binary::serialized_size(schema, record)
    }

    /// Encode a record into the binary form
    pub fn encode(&self, schema: &Schema, record: &Record) -> Result<Vec<u8>> {
        binary::serialize(schema, record)
    }

    /// Decode a record from the binary form
    pub fn decode(&self, schema: &Schema, data: &[u8]) -> Result<Record> {
        binary::deserialize_with_limits(schema, data, &self.config.limits)
    }

    /// Hash tree root of a record
    pub fn hash_tree_root(&self, schema: &Schema, record: &Record) -> Result<Hash> {
        merkle::hash_tree_root_with_limits(schema, record, &self.config.limits)
    }

    /// Encode a record into its textual form
    pub fn to_text(&self, schema: &Schema, record: &Record) -> Result<String> {
        text::to_json_string_with(schema, record, &self.config.text)
    }

    /// Decode a record from its textual form
    pub fn from_text(&self, schema: &Schema, input: &str) -> Result<Record> {
        text::from_json_str(schema, input)
    }

    /// Encode a record as flow-style YAML
    pub fn to_yaml(&self, schema: &Schema, record: &Record) -> Result<String> {
        yaml::to_yaml_string(schema, record)
    }

    /// Decode a record from YAML
    pub fn from_yaml(&self, schema: &Schema, input: &str) -> Result<Record> {
        yaml::from_yaml_str(schema, input)
    }
}
