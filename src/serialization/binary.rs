//! Offset-based binary wire format
//!
//! Layout of a region (a container, or a vector/list of variable-size items):
//! - fixed part: every fixed-size value inline, in declared order, and a 4-byte
//!   little-endian offset in place of every variable-size value;
//! - variable part: the payloads of the variable-size values, in declared order.
//!
//! Offsets are measured from the start of the region that holds them. Integers
//! are little-endian at their declared width. A region made only of fixed-size
//! values has no offsets and no variable part.
//!
//! Decoding validates offsets and declared maxima before allocating anything
//! whose size comes from the input, and is all-or-nothing.

use super::offset::{dynamic_item_count, item_ranges, ranges_from_offsets, read_offset, write_offset};
use crate::config::CodecLimits;
use crate::constants::BYTES_PER_LENGTH_OFFSET;
use crate::error::{CodecError, Result};
use crate::schema::{FieldKind, Schema};
use crate::types::{Record, Value};
use crate::uint::U256;
use std::borrow::Cow;
use tracing::debug;

/// Encoded size of a record.
///
/// Fixed fields contribute their width; each variable field contributes a
/// 4-byte offset slot plus its payload. Lists of variable items add one
/// offset slot per item.
pub fn serialized_size(schema: &Schema, record: &Record) -> Result<usize> {
    container_size(schema, record)
}

/// Encode a record.
///
/// The record is checked against the schema first, so a value that breaks a
/// declared maximum fails with `ItemTooLarge`/`ListTooLong` and nothing is
/// returned.
pub fn serialize(schema: &Schema, record: &Record) -> Result<Vec<u8>> {
    schema.validate()?;
    schema.check(record)?;
    let size = container_size(schema, record)?;
    let mut buf = Vec::with_capacity(size);
    encode_container(schema, record, &mut buf)?;
    debug_assert_eq!(
        buf.len(),
        size,
        "encoded length must equal computed size for {}",
        schema.name()
    );
    Ok(buf)
}

/// Decode a record with default limits.
pub fn deserialize(schema: &Schema, data: &[u8]) -> Result<Record> {
    deserialize_with_limits(schema, data, &CodecLimits::default())
}

/// Decode a record, bounding nesting depth by `limits`.
pub fn deserialize_with_limits(
    schema: &Schema,
    data: &[u8],
    limits: &CodecLimits,
) -> Result<Record> {
    schema.validate()?;
    let decoder = Decoder {
        max_depth: limits.max_nesting_depth,
    };
    decoder.container(schema, data, 0).map_err(|e| {
        debug!(
            target: "consensus_codec::binary",
            schema = schema.name(),
            len = data.len(),
            error = %e,
            "rejected binary input"
        );
        e
    })
}

fn container_size(schema: &Schema, record: &Record) -> Result<usize> {
    if record.len() != schema.fields().len() {
        return Err(CodecError::mismatch(format!(
            "{}: expected {} fields, got {}",
            schema.name(),
            schema.fields().len(),
            record.len()
        )));
    }
    let mut size = 0;
    for (field, value) in schema.fields().iter().zip(record.values()) {
        size += slot_size(field.kind(), value)?;
    }
    Ok(size)
}

/// Bytes a value takes inside its enclosing region: inline width, or offset plus payload.
fn slot_size(kind: &FieldKind, value: &Value) -> Result<usize> {
    match kind.fixed_size() {
        Some(size) => Ok(size),
        None => Ok(BYTES_PER_LENGTH_OFFSET + value_size(kind, value)?),
    }
}

fn value_size(kind: &FieldKind, value: &Value) -> Result<usize> {
    match (kind, value) {
        (FieldKind::FixedBytes(_), Value::Bytes(b))
        | (FieldKind::VariableBytes(_), Value::Bytes(b)) => Ok(b.len()),
        (FieldKind::Uint(w), Value::Uint(_)) => Ok(*w),
        (FieldKind::Vector(item, _), Value::Vector(items))
        | (FieldKind::List(item, _), Value::List(items)) => match item.fixed_size() {
            Some(size) => Ok(size * items.len()),
            None => items.iter().map(|v| slot_size(item, v)).sum(),
        },
        (FieldKind::Container(schema), Value::Container(record)) => container_size(schema, record),
        (kind, value) => Err(CodecError::mismatch(format!(
            "{} value for {} field",
            value.kind_name(),
            kind.name()
        ))),
    }
}

fn encode_container(schema: &Schema, record: &Record, buf: &mut Vec<u8>) -> Result<()> {
    let parts: Vec<(&FieldKind, &Value)> = schema
        .fields()
        .iter()
        .map(|f| f.kind())
        .zip(record.values())
        .collect();
    encode_region(&parts, buf)
}

/// Write a region: fixed part with offset slots, then variable payloads.
fn encode_region(parts: &[(&FieldKind, &Value)], buf: &mut Vec<u8>) -> Result<()> {
    let fixed_len: usize = parts.iter().map(|(k, _)| k.inline_size()).sum();
    let mut offset = fixed_len;
    for (kind, value) in parts {
        if kind.is_fixed_size() {
            encode_value(kind, value, buf)?;
        } else {
            write_offset(buf, offset)?;
            offset += value_size(kind, value)?;
        }
    }
    for (kind, value) in parts {
        if !kind.is_fixed_size() {
            encode_value(kind, value, buf)?;
        }
    }
    Ok(())
}

fn encode_value(kind: &FieldKind, value: &Value, buf: &mut Vec<u8>) -> Result<()> {
    match (kind, value) {
        (FieldKind::FixedBytes(_), Value::Bytes(b))
        | (FieldKind::VariableBytes(_), Value::Bytes(b)) => {
            buf.extend_from_slice(b);
            Ok(())
        }
        (FieldKind::Uint(w), Value::Uint(u)) => {
            buf.extend_from_slice(&u.to_le_bytes()[..*w]);
            Ok(())
        }
        (FieldKind::Vector(item, _), Value::Vector(items))
        | (FieldKind::List(item, _), Value::List(items)) => {
            if item.is_fixed_size() {
                for v in items {
                    encode_value(item, v, buf)?;
                }
                Ok(())
            } else {
                let parts: Vec<(&FieldKind, &Value)> =
                    items.iter().map(|v| (item.as_ref(), v)).collect();
                encode_region(&parts, buf)
            }
        }
        (FieldKind::Container(schema), Value::Container(record)) => {
            encode_container(schema, record, buf)
        }
        (kind, value) => Err(CodecError::mismatch(format!(
            "{} value for {} field",
            value.kind_name(),
            kind.name()
        ))),
    }
}

struct Decoder {
    max_depth: usize,
}

impl Decoder {
    fn container(&self, schema: &Schema, region: &[u8], depth: usize) -> Result<Record> {
        if depth > self.max_depth {
            return Err(CodecError::NestingTooDeep {
                max: self.max_depth,
            });
        }
        let fixed_part = schema.fixed_part_size();
        if region.len() < fixed_part {
            return Err(CodecError::ShortBuffer {
                needed: fixed_part,
                actual: region.len(),
            });
        }
        if schema.is_fixed_size() && region.len() != fixed_part {
            return Err(CodecError::TrailingBytes {
                expected: fixed_part,
                actual: region.len(),
            });
        }

        // Pass 1: locate inline values and read the offset table.
        let mut inline = Vec::with_capacity(schema.fields().len());
        let mut offsets = Vec::new();
        let mut pos = 0;
        for field in schema.fields() {
            match field.kind().fixed_size() {
                Some(size) => {
                    inline.push(Some(pos..pos + size));
                    pos += size;
                }
                None => {
                    let offset = read_offset(region, pos)?;
                    if offsets.is_empty() && offset != fixed_part {
                        return Err(CodecError::InvalidVariableOffset {
                            expected: fixed_part,
                            actual: offset,
                        });
                    }
                    offsets.push(offset);
                    inline.push(None);
                    pos += BYTES_PER_LENGTH_OFFSET;
                }
            }
        }
        let mut payloads = ranges_from_offsets(&offsets, region.len())?.into_iter();

        // Pass 2: decode every field from its byte range.
        let mut values = Vec::with_capacity(schema.fields().len());
        for (field, range) in schema.fields().iter().zip(inline) {
            let range = match range {
                Some(r) => r,
                None => payloads
                    .next()
                    .ok_or_else(|| CodecError::mismatch("offset table shorter than schema"))?,
            };
            values.push(self.value(field.kind(), &region[range], depth)?);
        }
        Ok(Record::new(values))
    }

    fn value(&self, kind: &FieldKind, region: &[u8], depth: usize) -> Result<Value> {
        match kind {
            FieldKind::FixedBytes(n) => {
                exact_len(region, *n)?;
                Ok(Value::Bytes(region.to_vec()))
            }
            FieldKind::Uint(w) => {
                exact_len(region, *w)?;
                let u = U256::from_le_slice(region).ok_or_else(|| {
                    CodecError::Config(Cow::Owned(format!("unsupported integer width {w}")))
                })?;
                Ok(Value::Uint(u))
            }
            FieldKind::VariableBytes(max) => {
                if region.len() > *max {
                    return Err(CodecError::ItemTooLarge {
                        len: region.len(),
                        max: *max,
                    });
                }
                Ok(Value::Bytes(region.to_vec()))
            }
            FieldKind::Vector(item, n) => self.items(item, region, *n, true, depth).map(Value::Vector),
            FieldKind::List(item, max) => self.items(item, region, *max, false, depth).map(Value::List),
            FieldKind::Container(schema) => self
                .container(schema, region, depth + 1)
                .map(Value::Container),
        }
    }

    /// Decode the items of a vector (`exact`) or list region.
    ///
    /// For a vector `bound` is the item count, for a list the maximum count.
    fn items(
        &self,
        item: &FieldKind,
        region: &[u8],
        bound: usize,
        exact: bool,
        depth: usize,
    ) -> Result<Vec<Value>> {
        if depth + 1 > self.max_depth {
            return Err(CodecError::NestingTooDeep {
                max: self.max_depth,
            });
        }
        match item.fixed_size() {
            Some(size) => {
                let count = if exact {
                    exact_len(region, size * bound)?;
                    bound
                } else {
                    if region.len() % size != 0 {
                        return Err(CodecError::MisalignedList {
                            len: region.len(),
                            item_size: size,
                        });
                    }
                    let count = region.len() / size;
                    if count > bound {
                        return Err(CodecError::ListTooLong { count, max: bound });
                    }
                    count
                };
                let mut items = Vec::with_capacity(count);
                for chunk in region.chunks_exact(size) {
                    items.push(self.value(item, chunk, depth + 1)?);
                }
                Ok(items)
            }
            None => {
                let count = if exact {
                    let table = bound * BYTES_PER_LENGTH_OFFSET;
                    if region.len() < table {
                        return Err(CodecError::ShortBuffer {
                            needed: table,
                            actual: region.len(),
                        });
                    }
                    bound
                } else {
                    dynamic_item_count(region, bound)?
                };
                let ranges = item_ranges(region, count)?;
                let mut items = Vec::with_capacity(count);
                for range in ranges {
                    items.push(self.value(item, &region[range], depth + 1)?);
                }
                Ok(items)
            }
        }
    }
}

fn exact_len(region: &[u8], expected: usize) -> Result<()> {
    if region.len() < expected {
        return Err(CodecError::ShortBuffer {
            needed: expected,
            actual: region.len(),
        });
    }
    if region.len() > expected {
        return Err(CodecError::TrailingBytes {
            expected,
            actual: region.len(),
        });
    }
    Ok(())
}
