//! Typed records bound to a schema
//!
//! A typed record converts itself to and from the generic [`Record`]; the
//! codecs do the rest. Implementors only provide the schema and the two
//! conversions.

use crate::error::Result;
use crate::merkle;
use crate::schema::Schema;
use crate::serialization::{binary, text, yaml};
use crate::types::{Hash, Record};

pub trait SszContainer: Sized {
    /// The schema this type is encoded with.
    fn schema() -> &'static Schema;

    fn to_record(&self) -> Record;

    fn from_record(record: Record) -> Result<Self>;

    fn to_ssz(&self) -> Result<Vec<u8>> {
        binary::serialize(Self::schema(), &self.to_record())
    }

    fn from_ssz(data: &[u8]) -> Result<Self> {
        binary::deserialize(Self::schema(), data).and_then(Self::from_record)
    }

    fn ssz_size(&self) -> Result<usize> {
        binary::serialized_size(Self::schema(), &self.to_record())
    }

    fn hash_tree_root(&self) -> Result<Hash> {
        merkle::hash_tree_root(Self::schema(), &self.to_record())
    }

    fn to_json(&self) -> Result<String> {
        text::to_json_string(Self::schema(), &self.to_record())
    }

    fn from_json(s: &str) -> Result<Self> {
        text::from_json_str(Self::schema(), s).and_then(Self::from_record)
    }

    /// Flow-style YAML, the same text `Display` prints.
    fn to_yaml(&self) -> Result<String> {
        yaml::to_yaml_string(Self::schema(), &self.to_record())
    }

    fn from_yaml(s: &str) -> Result<Self> {
        yaml::from_yaml_str(Self::schema(), s).and_then(Self::from_record)
    }
}
