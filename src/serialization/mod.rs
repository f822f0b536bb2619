//! Binary and textual encodings of schema-described records
//!
//! Both encodings are driven by a [`Schema`](crate::schema::Schema) and are
//! independent of each other. The binary form is offset-based: fixed fields
//! inline, 4-byte little-endian offsets for variable fields, then payloads in
//! declared order. The textual form is a JSON tree of `0x` hex strings and
//! decimal integer strings, with a flow-style YAML rendering in [`yaml`].

pub mod binary;
pub mod hex;
pub mod offset;
pub mod text;
pub mod yaml;

pub use binary::{deserialize, deserialize_with_limits, serialize, serialized_size};
pub use text::{from_json_str, from_json_value, to_json_string, to_json_value};
pub use yaml::{from_yaml_str, to_yaml_string};
