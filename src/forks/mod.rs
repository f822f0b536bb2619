//! Representative consensus records, grouped by the protocol version that
//! introduced them
//!
//! Each record has a schema function and a typed struct implementing
//! [`SszContainer`](crate::container::SszContainer). `Display` prints the
//! flow-style YAML form.

/// `Display` as flow-style YAML for typed records.
macro_rules! impl_yaml_display {
    ($($ty:ty),+ $(,)?) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match crate::container::SszContainer::to_yaml(self) {
                    Ok(text) => f.write_str(&text),
                    Err(e) => write!(f, "ERR: {e}"),
                }
            }
        }
    )+};
}

pub mod bellatrix;
pub mod capella;
pub mod phase0;

use crate::constants::{BLS_SIGNATURE_LENGTH, EXECUTION_ADDRESS_LENGTH, VERSION_LENGTH};
use crate::error::{CodecError, Result};
use crate::types::{ByteString, Hash, Value};

pub type Slot = u64;
pub type Epoch = u64;
pub type ValidatorIndex = u64;
pub type WithdrawalIndex = u64;
pub type Gwei = u64;
pub type Root = Hash;
pub type Version = [u8; VERSION_LENGTH];
pub type BlsSignature = [u8; BLS_SIGNATURE_LENGTH];
pub type ExecutionAddress = [u8; EXECUTION_ADDRESS_LENGTH];
pub type Transaction = ByteString;

/// Unwrap list items that are plain byte strings.
pub(crate) fn byte_items(items: Vec<Value>) -> Result<Vec<ByteString>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Bytes(b) => Ok(b),
            other => Err(CodecError::mismatch(format!(
                "{} item in byte-string list",
                other.kind_name()
            ))),
        })
        .collect()
}

pub(crate) fn bytes_value(bytes: &[u8]) -> Value {
    Value::Bytes(bytes.to_vec())
}
