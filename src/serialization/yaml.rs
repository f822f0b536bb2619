//! YAML form of the textual encoding
//!
//! Records print as a single line of flow-style YAML: containers as
//! `{key: value, ...}`, integers as bare decimals, byte fields as
//! single-quoted `0x` hex, vectors and lists as `[a, b]`. This is also the
//! `Display` form of the typed records in [`forks`](crate::forks).
//!
//! Decoding is schema-driven. Scalar positions are read as raw scalar text, so
//! integers of any width reach the decimal parser unchanged instead of going
//! through a 64-bit YAML number. The resulting tree is then checked exactly
//! like JSON input and fails with the same [`TextError`] vocabulary.

use super::hex::encode_prefixed;
use super::text;
use crate::error::{CodecError, Result, TextError};
use crate::schema::{FieldKind, Schema};
use crate::types::{Record, Value};
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value as Json};
use std::fmt;
use tracing::debug;

/// Encode a record as one line of flow-style YAML, without a trailing newline.
pub fn to_yaml_string(schema: &Schema, record: &Record) -> Result<String> {
    schema.check(record)?;
    let mut out = String::new();
    write_container(schema, record, &mut out)?;
    Ok(out)
}

/// Decode a record from YAML text.
///
/// Text that is not well-formed YAML fails with the parser's own message.
pub fn from_yaml_str(schema: &Schema, input: &str) -> Result<Record> {
    let tree = Expect::Fields(schema)
        .deserialize(serde_yaml::Deserializer::from_str(input))
        .map_err(|e| {
            debug!(target: "consensus_codec::yaml", schema = schema.name(), error = %e, "unparseable yaml");
            CodecError::Text(TextError::Parse(e.to_string()))
        })?;
    text::from_json_value(schema, &tree)
}

fn write_container(schema: &Schema, record: &Record, out: &mut String) -> Result<()> {
    out.push('{');
    for (i, (field, value)) in schema.fields().iter().zip(record.values()).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(field.key());
        out.push_str(": ");
        write_value(field.kind(), value, out)?;
    }
    out.push('}');
    Ok(())
}

fn write_value(kind: &FieldKind, value: &Value, out: &mut String) -> Result<()> {
    match (kind, value) {
        (FieldKind::FixedBytes(_), Value::Bytes(b))
        | (FieldKind::VariableBytes(_), Value::Bytes(b)) => {
            out.push('\'');
            out.push_str(&encode_prefixed(b));
            out.push('\'');
        }
        (FieldKind::Uint(_), Value::Uint(u)) => out.push_str(&u.to_string()),
        (FieldKind::Vector(item, _), Value::Vector(items))
        | (FieldKind::List(item, _), Value::List(items)) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, v, out)?;
            }
            out.push(']');
        }
        (FieldKind::Container(schema), Value::Container(record)) => {
            write_container(schema, record, out)?
        }
        (kind, value) => {
            return Err(CodecError::mismatch(format!(
                "{} value for {} field",
                value.kind_name(),
                kind.name()
            )))
        }
    }
    Ok(())
}

/// What the schema expects at a position of the YAML document.
#[derive(Clone, Copy)]
enum Expect<'a> {
    Scalar,
    Items(&'a FieldKind),
    Fields(&'a Schema),
}

impl<'a> Expect<'a> {
    fn of(kind: &'a FieldKind) -> Self {
        match kind {
            FieldKind::Vector(item, _) | FieldKind::List(item, _) => Expect::Items(item),
            FieldKind::Container(schema) => Expect::Fields(schema),
            _ => Expect::Scalar,
        }
    }
}

impl<'de> DeserializeSeed<'de> for Expect<'_> {
    type Value = Json;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Json, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match self {
            Expect::Scalar => deserializer.deserialize_str(NodeVisitor(self)),
            _ => deserializer.deserialize_any(NodeVisitor(self)),
        }
    }
}

struct NodeVisitor<'a>(Expect<'a>);

impl<'de> Visitor<'de> for NodeVisitor<'_> {
    type Value = Json;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expect::Scalar => f.write_str("a scalar"),
            Expect::Items(_) => f.write_str("a sequence"),
            Expect::Fields(schema) => write!(f, "a mapping for {}", schema.name()),
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Json, E> {
        Ok(Json::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Json, E> {
        Ok(Json::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Json, E> {
        Ok(Json::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Json, A::Error> {
        let item = match self.0 {
            Expect::Items(item) => Expect::of(item),
            _ => Expect::Scalar,
        };
        let mut nodes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(node) = seq.next_element_seed(item)? {
            nodes.push(node);
        }
        Ok(Json::Array(nodes))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Json, A::Error> {
        let mut object = Map::new();
        let Expect::Fields(schema) = self.0 else {
            // Wrong shape; the text checks report it.
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            return Ok(Json::Object(object));
        };
        while let Some(key) = map.next_key::<String>()? {
            match schema.fields().iter().find(|f| f.key() == key) {
                Some(field) => {
                    let node = map.next_value_seed(Expect::of(field.kind()))?;
                    object.insert(key, node);
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(Json::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uint::U256;

    fn header_schema() -> Schema {
        Schema::new("Header")
            .field("slot", FieldKind::Uint(8))
            .field("root", FieldKind::FixedBytes(4))
    }

    fn wide_schema() -> Schema {
        Schema::new("Wide")
            .field("fee", FieldKind::Uint(32))
            .field("extra", FieldKind::VariableBytes(8))
            .field("items", FieldKind::list(FieldKind::Uint(2), 4))
            .field("header", FieldKind::Container(header_schema()))
    }

    fn wide_record(fee: U256) -> Record {
        Record::new(vec![
            Value::Uint(fee),
            Value::bytes(vec![0xab, 0xcd]),
            Value::List(vec![Value::uint(1u16), Value::uint(65535u16)]),
            Value::Container(Record::new(vec![
                Value::uint(7u64),
                Value::bytes(vec![1, 2, 3, 4]),
            ])),
        ])
    }

    #[test]
    fn test_flow_style_output() {
        let text = to_yaml_string(&wide_schema(), &wide_record(U256::from(9u64))).unwrap();
        assert_eq!(
            text,
            "{fee: 9, extra: '0xabcd', items: [1, 65535], header: {slot: 7, root: '0x01020304'}}"
        );
    }

    #[test]
    fn test_full_width_integer_round_trip() {
        let max = U256::from_dec_str_with_width(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
            32,
        )
        .unwrap();
        let record = wide_record(max);
        let text = to_yaml_string(&wide_schema(), &record).unwrap();
        assert_eq!(from_yaml_str(&wide_schema(), &text).unwrap(), record);
    }

    #[test]
    fn test_block_style_input() {
        let input = "fee: 340282366920938463463374607431768211456\n\
                     extra: '0x'\n\
                     items:\n  - 3\n\
                     header:\n  slot: 18446744073709551615\n  root: '0xdeadbeef'\n\
                     unknown: [1, 2]\n";
        let record = from_yaml_str(&wide_schema(), input).unwrap();
        let fee = U256::from_dec_str_with_width("340282366920938463463374607431768211456", 32)
            .unwrap();
        assert_eq!(
            record,
            Record::new(vec![
                Value::Uint(fee),
                Value::bytes(Vec::new()),
                Value::List(vec![Value::uint(3u16)]),
                Value::Container(Record::new(vec![
                    Value::uint(u64::MAX),
                    Value::bytes(vec![0xde, 0xad, 0xbe, 0xef]),
                ])),
            ])
        );
    }

    #[test]
    fn test_errors_use_text_vocabulary() {
        let schema = header_schema();
        assert_eq!(
            from_yaml_str(&schema, "{root: '0x01020304'}"),
            Err(CodecError::Text(TextError::Missing("slot".to_string())))
        );
        assert_eq!(
            from_yaml_str(&schema, "{slot: 1, root: '0x0102'}"),
            Err(CodecError::Text(TextError::IncorrectLength("root".to_string())))
        );
        assert!(matches!(
            from_yaml_str(&schema, "{slot: 18446744073709551616, root: '0x01020304'}"),
            Err(CodecError::Text(TextError::InvalidValue { ref field, .. })) if field == "slot"
        ));
        assert!(matches!(
            from_yaml_str(&schema, "[1, 2]"),
            Err(CodecError::Text(TextError::InvalidJson(_)))
        ));
        assert!(matches!(
            from_yaml_str(&schema, "{slot: [1"),
            Err(CodecError::Text(TextError::Parse(_)))
        ));
    }

    #[test]
    fn test_encode_rejects_mismatched_record() {
        let record = Record::new(vec![Value::bytes(vec![1]), Value::bytes(vec![1, 2, 3, 4])]);
        assert!(matches!(
            to_yaml_string(&header_schema(), &record),
            Err(CodecError::SchemaMismatch(_))
        ));
    }
}
