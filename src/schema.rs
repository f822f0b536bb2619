//! Declarative record schemas shared by the binary, Merkle and textual codecs
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Field order is load-bearing:
//! it fixes the binary layout, the Merkle leaf order and the textual key order.
//! Maxima live here as explicit configuration rather than per-type constants.

use crate::constants::BYTES_PER_LENGTH_OFFSET;
use crate::error::{CodecError, Result};
use crate::types::{Record, Value};
use std::borrow::Cow;

/// Integer widths in bytes that may back a `Uint` field.
pub const UINT_WIDTHS: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// Kind of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Byte array of exactly N bytes.
    FixedBytes(usize),
    /// Little-endian unsigned integer of the given width in bytes.
    Uint(usize),
    /// Byte sequence of at most `max` bytes.
    VariableBytes(usize),
    /// Exactly N items.
    Vector(Box<FieldKind>, usize),
    /// Between 0 and `max` items.
    List(Box<FieldKind>, usize),
    /// Nested record.
    Container(Schema),
}

impl FieldKind {
    pub fn vector(item: FieldKind, len: usize) -> Self {
        FieldKind::Vector(Box::new(item), len)
    }

    pub fn list(item: FieldKind, max: usize) -> Self {
        FieldKind::List(Box::new(item), max)
    }

    /// Basic kinds pack into shared chunks when Merkleized.
    pub fn is_basic(&self) -> bool {
        matches!(self, FieldKind::Uint(_))
    }

    pub fn is_fixed_size(&self) -> bool {
        match self {
            FieldKind::FixedBytes(_) | FieldKind::Uint(_) => true,
            FieldKind::VariableBytes(_) | FieldKind::List(_, _) => false,
            FieldKind::Vector(item, _) => item.is_fixed_size(),
            FieldKind::Container(schema) => schema.is_fixed_size(),
        }
    }

    /// Serialized size for fixed-size kinds, `None` for variable-size ones.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldKind::FixedBytes(n) => Some(*n),
            FieldKind::Uint(w) => Some(*w),
            FieldKind::VariableBytes(_) | FieldKind::List(_, _) => None,
            FieldKind::Vector(item, n) => item.fixed_size().map(|s| s * n),
            FieldKind::Container(schema) => schema.fixed_size(),
        }
    }

    /// Bytes this kind occupies in the fixed part of an enclosing region.
    pub fn inline_size(&self) -> usize {
        self.fixed_size().unwrap_or(BYTES_PER_LENGTH_OFFSET)
    }

    fn validate(&self, path: &str) -> Result<()> {
        match self {
            FieldKind::Uint(w) if !UINT_WIDTHS.contains(w) => Err(CodecError::Config(
                Cow::Owned(format!("{path}: unsupported integer width {w}")),
            )),
            FieldKind::FixedBytes(0) => Err(CodecError::Config(Cow::Owned(format!(
                "{path}: fixed byte array must not be empty"
            )))),
            FieldKind::Vector(_, 0) => Err(CodecError::Config(Cow::Owned(format!(
                "{path}: vector must hold at least one item"
            )))),
            FieldKind::Vector(item, _) | FieldKind::List(item, _) => item.validate(path),
            FieldKind::Container(schema) => schema.validate(),
            _ => Ok(()),
        }
    }

    /// Check that `value` conforms to this kind, including declared maxima.
    pub fn check(&self, value: &Value, path: &str) -> Result<()> {
        match (self, value) {
            (FieldKind::FixedBytes(n), Value::Bytes(b)) => {
                if b.len() != *n {
                    return Err(CodecError::mismatch(format!(
                        "{path}: expected {n} bytes, got {}",
                        b.len()
                    )));
                }
                Ok(())
            }
            (FieldKind::Uint(w), Value::Uint(u)) => {
                if !u.fits_width(*w) {
                    return Err(CodecError::mismatch(format!(
                        "{path}: value {u} does not fit in {w} bytes"
                    )));
                }
                Ok(())
            }
            (FieldKind::VariableBytes(max), Value::Bytes(b)) => {
                if b.len() > *max {
                    return Err(CodecError::ItemTooLarge {
                        len: b.len(),
                        max: *max,
                    });
                }
                Ok(())
            }
            (FieldKind::Vector(item, n), Value::Vector(items)) => {
                if items.len() != *n {
                    return Err(CodecError::mismatch(format!(
                        "{path}: vector needs {n} items, got {}",
                        items.len()
                    )));
                }
                for (i, v) in items.iter().enumerate() {
                    item.check(v, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            (FieldKind::List(item, max), Value::List(items)) => {
                if items.len() > *max {
                    return Err(CodecError::ListTooLong {
                        count: items.len(),
                        max: *max,
                    });
                }
                for (i, v) in items.iter().enumerate() {
                    item.check(v, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            (FieldKind::Container(schema), Value::Container(record)) => schema.check(record),
            (kind, value) => Err(CodecError::mismatch(format!(
                "{path}: {} value for {} field",
                value.kind_name(),
                kind.name()
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::FixedBytes(_) => "fixed bytes",
            FieldKind::Uint(_) => "uint",
            FieldKind::VariableBytes(_) => "variable bytes",
            FieldKind::Vector(_, _) => "vector",
            FieldKind::List(_, _) => "list",
            FieldKind::Container(_) => "container",
        }
    }
}

/// How the textual decoder treats a field that is absent from the text tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsentPolicy {
    /// Report `"<field> missing"`.
    #[default]
    Reject,
    /// Treat as an empty hex string and validate it like any other value, so a
    /// fixed-width field reports `"incorrect length for <field>"`.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: Cow<'static, str>,
    label: String,
    kind: FieldKind,
    absent: AbsentPolicy,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, kind: FieldKind) -> Self {
        let key = key.into();
        let label = key.replace('_', " ");
        Field {
            key,
            label,
            kind,
            absent: AbsentPolicy::Reject,
        }
    }

    pub fn with_absent_policy(mut self, policy: AbsentPolicy) -> Self {
        self.absent = policy;
        self
    }

    /// Key in the textual form, e.g. `genesis_validators_root`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human label used in error messages, e.g. `genesis validators root`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn absent_policy(&self) -> AbsentPolicy {
        self.absent
    }
}

/// Ordered, immutable field list describing one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: Cow<'static, str>,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Schema {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field with the default absent policy.
    pub fn field(mut self, key: impl Into<Cow<'static, str>>, kind: FieldKind) -> Self {
        self.fields.push(Field::new(key, kind));
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_fixed_size(&self) -> bool {
        self.fields.iter().all(|f| f.kind.is_fixed_size())
    }

    pub fn fixed_size(&self) -> Option<usize> {
        if self.is_fixed_size() {
            Some(self.fixed_part_size())
        } else {
            None
        }
    }

    /// Size of the fixed part: inline fields plus one offset slot per variable field.
    pub fn fixed_part_size(&self) -> usize {
        self.fields.iter().map(|f| f.kind.inline_size()).sum()
    }

    /// Reject unsupported widths and empty fixed kinds, recursively.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(CodecError::Config(Cow::Owned(format!(
                "{}: container must declare at least one field",
                self.name
            ))));
        }
        for field in &self.fields {
            field
                .kind
                .validate(&format!("{}.{}", self.name, field.key))?;
        }
        Ok(())
    }

    /// Check that a record conforms to this schema, including declared maxima.
    pub fn check(&self, record: &Record) -> Result<()> {
        if record.len() != self.fields.len() {
            return Err(CodecError::mismatch(format!(
                "{}: expected {} fields, got {}",
                self.name,
                self.fields.len(),
                record.len()
            )));
        }
        for (field, value) in self.fields.iter().zip(record.values()) {
            field
                .kind
                .check(value, &format!("{}.{}", self.name, field.key))?;
        }
        Ok(())
    }
}
