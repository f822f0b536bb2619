//! Canonical textual (JSON) form
//!
//! Conventions:
//! - fixed and variable byte fields are `0x`-prefixed lowercase hex;
//! - integers are decimal strings, so uint64 and wider survive any JSON reader;
//! - containers are objects whose keys follow schema order;
//! - vectors and lists are arrays.
//!
//! Decoding walks the schema in order and stops at the first failure. The error
//! strings are a public contract, see [`TextError`].

use super::hex::{decode_prefixed, encode_prefixed};
use crate::config::TextFormatConfig;
use crate::error::{CodecError, Result, TextError};
use crate::schema::{AbsentPolicy, Field, FieldKind, Schema};
use crate::types::{Record, Value};
use crate::uint::U256;
use serde_json::{Map, Value as Json};
use tracing::debug;

/// Encode a record into a text tree.
pub fn to_json_value(schema: &Schema, record: &Record) -> Result<Json> {
    schema.check(record)?;
    encode_container(schema, record)
}

/// Encode a record into its compact canonical text.
pub fn to_json_string(schema: &Schema, record: &Record) -> Result<String> {
    to_json_string_with(schema, record, &TextFormatConfig::default())
}

/// Encode a record, honouring the formatting options.
pub fn to_json_string_with(
    schema: &Schema,
    record: &Record,
    format: &TextFormatConfig,
) -> Result<String> {
    let tree = to_json_value(schema, record)?;
    let text = if format.pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    };
    // A tree made of strings, arrays and objects always serializes.
    text.map_err(|e| CodecError::mismatch(e.to_string()))
}

/// Decode a record from raw text.
///
/// Text that is not even well-formed JSON fails with the parser's own message.
pub fn from_json_str(schema: &Schema, text: &str) -> Result<Record> {
    let tree: Json = serde_json::from_str(text).map_err(|e| {
        debug!(target: "consensus_codec::text", schema = schema.name(), error = %e, "unparseable text");
        TextError::Parse(e.to_string())
    })?;
    from_json_value(schema, &tree)
}

/// Decode a record from a text tree.
pub fn from_json_value(schema: &Schema, tree: &Json) -> Result<Record> {
    decode_container(schema, tree).map_err(|e| {
        debug!(target: "consensus_codec::text", schema = schema.name(), error = %e, "rejected text input");
        CodecError::Text(e)
    })
}

fn encode_container(schema: &Schema, record: &Record) -> Result<Json> {
    let mut map = Map::with_capacity(schema.fields().len());
    for (field, value) in schema.fields().iter().zip(record.values()) {
        map.insert(field.key().to_string(), encode_value(field.kind(), value)?);
    }
    Ok(Json::Object(map))
}

fn encode_value(kind: &FieldKind, value: &Value) -> Result<Json> {
    match (kind, value) {
        (FieldKind::FixedBytes(_), Value::Bytes(b))
        | (FieldKind::VariableBytes(_), Value::Bytes(b)) => Ok(Json::String(encode_prefixed(b))),
        (FieldKind::Uint(_), Value::Uint(u)) => Ok(Json::String(u.to_string())),
        (FieldKind::Vector(item, _), Value::Vector(items))
        | (FieldKind::List(item, _), Value::List(items)) => items
            .iter()
            .map(|v| encode_value(item, v))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        (FieldKind::Container(schema), Value::Container(record)) => {
            encode_container(schema, record)
        }
        (kind, value) => Err(CodecError::mismatch(format!(
            "{} value for {} field",
            value.kind_name(),
            kind.name()
        ))),
    }
}

fn json_kind(node: &Json) -> &'static str {
    match node {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn decode_container(schema: &Schema, node: &Json) -> std::result::Result<Record, TextError> {
    let map = match node {
        Json::Object(map) => map,
        other => {
            return Err(TextError::InvalidJson(format!(
                "cannot unmarshal {} into {}",
                json_kind(other),
                schema.name()
            )))
        }
    };
    let mut values = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let node = map.get(field.key()).filter(|n| !n.is_null());
        values.push(decode_field(schema, field, node)?);
    }
    Ok(Record::new(values))
}

fn decode_field(
    owner: &Schema,
    field: &Field,
    node: Option<&Json>,
) -> std::result::Result<Value, TextError> {
    let ctx = Ctx {
        owner: owner.name(),
        key: field.key(),
    };
    match node {
        Some(node) => ctx.decode(field.kind(), node, field.label()),
        None => {
            let substitute = match (field.absent_policy(), field.kind()) {
                (AbsentPolicy::Reject, _) | (AbsentPolicy::Empty, FieldKind::Container(_)) => {
                    return Err(TextError::Missing(field.label().to_string()))
                }
                (AbsentPolicy::Empty, FieldKind::Vector(_, _))
                | (AbsentPolicy::Empty, FieldKind::List(_, _)) => Json::Array(Vec::new()),
                (AbsentPolicy::Empty, _) => Json::String(String::new()),
            };
            ctx.decode(field.kind(), &substitute, field.label())
        }
    }
}

/// Where a value sits, for shape diagnostics.
struct Ctx<'a> {
    owner: &'a str,
    key: &'a str,
}

impl Ctx<'_> {
    fn decode(
        &self,
        kind: &FieldKind,
        node: &Json,
        label: &str,
    ) -> std::result::Result<Value, TextError> {
        match kind {
            FieldKind::FixedBytes(n) => {
                let bytes = self.hex(node, label)?;
                if bytes.len() != *n {
                    return Err(TextError::IncorrectLength(label.to_string()));
                }
                Ok(Value::Bytes(bytes))
            }
            FieldKind::VariableBytes(max) => {
                let bytes = self.hex(node, label)?;
                if bytes.len() > *max {
                    return Err(TextError::IncorrectLength(label.to_string()));
                }
                Ok(Value::Bytes(bytes))
            }
            FieldKind::Uint(width) => {
                let s = self.string(node)?;
                let value = U256::from_dec_str_with_width(s, *width).map_err(|e| {
                    TextError::InvalidValue {
                        field: label.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Value::Uint(value))
            }
            FieldKind::Vector(item, n) => {
                let nodes = self.array(node)?;
                if nodes.len() != *n {
                    return Err(TextError::IncorrectLength(label.to_string()));
                }
                self.items(item, nodes, label).map(Value::Vector)
            }
            FieldKind::List(item, max) => {
                let nodes = self.array(node)?;
                if nodes.len() > *max {
                    return Err(TextError::IncorrectLength(label.to_string()));
                }
                self.items(item, nodes, label).map(Value::List)
            }
            FieldKind::Container(schema) => decode_container(schema, node)
                .map(Value::Container)
                .map_err(|e| TextError::InvalidJson(e.to_string())),
        }
    }

    fn items(
        &self,
        item: &FieldKind,
        nodes: &[Json],
        label: &str,
    ) -> std::result::Result<Vec<Value>, TextError> {
        let mut values = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            values.push(self.decode(item, node, &format!("{label}[{i}]"))?);
        }
        Ok(values)
    }

    fn hex(&self, node: &Json, label: &str) -> std::result::Result<Vec<u8>, TextError> {
        let s = self.string(node)?;
        decode_prefixed(s).map_err(|e| TextError::InvalidValue {
            field: label.to_string(),
            reason: e.to_string(),
        })
    }

    fn string<'n>(&self, node: &'n Json) -> std::result::Result<&'n str, TextError> {
        node.as_str().ok_or_else(|| self.shape(node, "string"))
    }

    fn array<'n>(&self, node: &'n Json) -> std::result::Result<&'n [Json], TextError> {
        match node {
            Json::Array(nodes) => Ok(nodes),
            other => Err(self.shape(other, "array")),
        }
    }

    fn shape(&self, found: &Json, expected: &str) -> TextError {
        TextError::InvalidJson(format!(
            "cannot unmarshal {} into field {}.{} of type {expected}",
            json_kind(found),
            self.owner,
            self.key
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> Schema {
        Schema::new("Inner")
            .field("slot", FieldKind::Uint(8))
            .field("root", FieldKind::FixedBytes(4))
    }

    fn outer() -> Schema {
        Schema::new("Outer")
            .field("message", FieldKind::Container(inner()))
            .field("extra_data", FieldKind::VariableBytes(4))
            .field("values", FieldKind::list(FieldKind::Uint(2), 2))
            .with_field(
                Field::new("signature", FieldKind::FixedBytes(2))
                    .with_absent_policy(AbsentPolicy::Empty),
            )
    }

    fn message(err: CodecError) -> String {
        err.to_string()
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let text = r#"{"message":{"slot":"7","root":"0x01020304"},"extra_data":"0xab","values":["1","65535"],"signature":"0xbeef"}"#;
        let record = from_json_str(&outer(), text).unwrap();
        assert_eq!(to_json_string(&outer(), &record).unwrap(), text);
    }

    #[test]
    fn test_pretty_output_reparses() {
        let text = r#"{"message":{"slot":"7","root":"0x01020304"},"extra_data":"0x","values":[],"signature":"0xbeef"}"#;
        let record = from_json_str(&outer(), text).unwrap();
        let pretty =
            to_json_string_with(&outer(), &record, &TextFormatConfig { pretty: true }).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(from_json_str(&outer(), &pretty).unwrap(), record);
    }

    #[test]
    fn test_missing_field_uses_label() {
        let err = from_json_str(&outer(), "{}").unwrap_err();
        assert_eq!(message(err), "message missing");
        let err = from_json_str(&inner(), r#"{"slot":"1"}"#).unwrap_err();
        assert_eq!(message(err), "root missing");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = from_json_str(&inner(), r#"{"slot":null,"root":"0x00000000"}"#).unwrap_err();
        assert_eq!(message(err), "slot missing");
    }

    #[test]
    fn test_absent_empty_policy_reports_length() {
        let text = r#"{"message":{"slot":"7","root":"0x01020304"},"extra_data":"0x","values":[]}"#;
        let err = from_json_str(&outer(), text).unwrap_err();
        assert_eq!(message(err), "incorrect length for signature");
    }

    #[test]
    fn test_nested_shape_error_is_wrapped() {
        let text = r#"{"message":true,"extra_data":"0x","values":[],"signature":"0xbeef"}"#;
        let err = from_json_str(&outer(), text).unwrap_err();
        assert_eq!(
            message(err),
            "invalid JSON: invalid JSON: cannot unmarshal bool into Inner"
        );
    }

    #[test]
    fn test_field_shape_error_names_owner() {
        let err = from_json_str(&inner(), r#"{"slot":7,"root":"0x00000000"}"#).unwrap_err();
        assert_eq!(
            message(err),
            "invalid JSON: cannot unmarshal number into field Inner.slot of type string"
        );
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = from_json_str(&inner(), "[]").unwrap_err();
        assert_eq!(message(err), "invalid JSON: cannot unmarshal array into Inner");
    }

    #[test]
    fn test_bad_hex_and_length() {
        let err = from_json_str(&inner(), r#"{"slot":"1","root":"0xzz000000"}"#).unwrap_err();
        assert!(message(err).starts_with("invalid value for root: "));
        let err = from_json_str(&inner(), r#"{"slot":"1","root":"0x0000"}"#).unwrap_err();
        assert_eq!(message(err), "incorrect length for root");
    }

    #[test]
    fn test_uint_parse_errors() {
        let err = from_json_str(&inner(), r#"{"slot":"-1","root":"0x00000000"}"#).unwrap_err();
        assert!(message(err).starts_with("invalid value for slot: "));
        let err = from_json_str(
            &inner(),
            r#"{"slot":"18446744073709551616","root":"0x00000000"}"#,
        )
        .unwrap_err();
        assert!(message(err).starts_with("invalid value for slot: "));
    }

    #[test]
    fn test_list_over_max_and_item_labels() {
        let base = r#"{"message":{"slot":"7","root":"0x01020304"},"extra_data":"0x","signature":"0xbeef","values":"#;
        let err = from_json_str(&outer(), &format!(r#"{base}["1","2","3"]}}"#)).unwrap_err();
        assert_eq!(message(err), "incorrect length for values");
        let err = from_json_str(&outer(), &format!(r#"{base}["1","x"]}}"#)).unwrap_err();
        assert!(message(err).starts_with("invalid value for values[1]: "));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let record = from_json_str(
            &inner(),
            r#"{"zzz":1,"root":"0x00000000","slot":"3"}"#,
        )
        .unwrap();
        assert_eq!(
            to_json_string(&inner(), &record).unwrap(),
            r#"{"slot":"3","root":"0x00000000"}"#
        );
    }

    #[test]
    fn test_unparseable_text_passes_parser_message() {
        let err = from_json_str(&inner(), "{").unwrap_err();
        assert!(matches!(err, CodecError::Text(TextError::Parse(_))));
    }
}
