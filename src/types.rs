//! In-memory values that the codecs operate on

use crate::error::{CodecError, Result};
use crate::uint::U256;

/// Hash type: 256-bit digest
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// A single field value.
///
/// Fixed-size and variable-size byte fields are both `Bytes`; the schema decides
/// which length rules apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bytes(ByteString),
    Uint(U256),
    Vector(Vec<Value>),
    List(Vec<Value>),
    Container(Record),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Uint(_) => "uint",
            Value::Vector(_) => "vector",
            Value::List(_) => "list",
            Value::Container(_) => "container",
        }
    }

    pub fn uint(v: impl Into<U256>) -> Self {
        Value::Uint(v.into())
    }

    pub fn bytes(b: impl Into<ByteString>) -> Self {
        Value::Bytes(b.into())
    }
}

/// A record: one value per schema field, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Record { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Consume the record into a cursor for typed field extraction.
    pub fn into_fields(self) -> FieldReader {
        FieldReader {
            inner: self.values.into_iter(),
            index: 0,
        }
    }
}

/// Sequential typed reader over a record's values.
///
/// Used by typed records to rebuild themselves from a decoded [`Record`].
pub struct FieldReader {
    inner: std::vec::IntoIter<Value>,
    index: usize,
}

impl FieldReader {
    fn next_value(&mut self) -> Result<Value> {
        let index = self.index;
        self.index += 1;
        self.inner
            .next()
            .ok_or_else(|| CodecError::mismatch(format!("record has no field {index}")))
    }

    pub fn bytes(&mut self) -> Result<ByteString> {
        match self.next_value()? {
            Value::Bytes(b) => Ok(b),
            other => Err(self.unexpected("bytes", &other)),
        }
    }

    pub fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let b = self.bytes()?;
        let len = b.len();
        b.try_into().map_err(|_| {
            CodecError::mismatch(format!(
                "field {} holds {len} bytes, expected {N}",
                self.index - 1
            ))
        })
    }

    pub fn uint(&mut self) -> Result<U256> {
        match self.next_value()? {
            Value::Uint(u) => Ok(u),
            other => Err(self.unexpected("uint", &other)),
        }
    }

    pub fn u64(&mut self) -> Result<u64> {
        let v = self.uint()?;
        v.as_u64().ok_or_else(|| {
            CodecError::mismatch(format!("field {} does not fit in u64", self.index - 1))
        })
    }

    pub fn items(&mut self) -> Result<Vec<Value>> {
        match self.next_value()? {
            Value::Vector(items) | Value::List(items) => Ok(items),
            other => Err(self.unexpected("list", &other)),
        }
    }

    pub fn record(&mut self) -> Result<Record> {
        match self.next_value()? {
            Value::Container(r) => Ok(r),
            other => Err(self.unexpected("container", &other)),
        }
    }

    fn unexpected(&self, expected: &str, found: &Value) -> CodecError {
        CodecError::mismatch(format!(
            "field {} holds {}, expected {expected}",
            self.index - 1,
            found.kind_name()
        ))
    }
}
