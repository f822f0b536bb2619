//! bellatrix records: execution payloads carried in beacon blocks

use super::{byte_items, bytes_value, ExecutionAddress, Root, Transaction};
use crate::constants::{
    BYTES_PER_LOGS_BLOOM, EXECUTION_ADDRESS_LENGTH, MAX_BYTES_PER_TRANSACTION,
    MAX_EXTRA_DATA_BYTES, MAX_TRANSACTIONS_PER_PAYLOAD, ROOT_LENGTH,
};
use crate::container::SszContainer;
use crate::error::Result;
use crate::merkle;
use crate::schema::{FieldKind, Schema};
use crate::types::{ByteString, FieldReader, Record, Value};
use crate::uint::U256;
use std::sync::OnceLock;

pub fn transactions_kind() -> FieldKind {
    FieldKind::list(
        FieldKind::VariableBytes(MAX_BYTES_PER_TRANSACTION),
        MAX_TRANSACTIONS_PER_PAYLOAD,
    )
}

/// Fields shared by payloads and payload headers, up to and including `block_hash`.
pub(crate) fn payload_base(name: &'static str) -> Schema {
    Schema::new(name)
        .field("parent_hash", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("fee_recipient", FieldKind::FixedBytes(EXECUTION_ADDRESS_LENGTH))
        .field("state_root", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("receipts_root", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("logs_bloom", FieldKind::FixedBytes(BYTES_PER_LOGS_BLOOM))
        .field("prev_randao", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("block_number", FieldKind::Uint(8))
        .field("gas_limit", FieldKind::Uint(8))
        .field("gas_used", FieldKind::Uint(8))
        .field("timestamp", FieldKind::Uint(8))
        .field("extra_data", FieldKind::VariableBytes(MAX_EXTRA_DATA_BYTES))
        .field("base_fee_per_gas", FieldKind::Uint(32))
        .field("block_hash", FieldKind::FixedBytes(ROOT_LENGTH))
}

pub fn execution_payload_schema() -> Schema {
    payload_base("ExecutionPayload").field("transactions", transactions_kind())
}

pub fn execution_payload_header_schema() -> Schema {
    payload_base("ExecutionPayloadHeader")
        .field("transactions_root", FieldKind::FixedBytes(ROOT_LENGTH))
}

/// The execution block fields common to payloads and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionBlock {
    pub parent_hash: Root,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Root,
    pub receipts_root: Root,
    pub logs_bloom: [u8; BYTES_PER_LOGS_BLOOM],
    pub prev_randao: Root,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: ByteString,
    pub base_fee_per_gas: U256,
    pub block_hash: Root,
}

impl Default for ExecutionBlock {
    fn default() -> Self {
        ExecutionBlock {
            parent_hash: [0u8; 32],
            fee_recipient: [0u8; EXECUTION_ADDRESS_LENGTH],
            state_root: [0u8; 32],
            receipts_root: [0u8; 32],
            logs_bloom: [0u8; BYTES_PER_LOGS_BLOOM],
            prev_randao: [0u8; 32],
            block_number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            base_fee_per_gas: U256::ZERO,
            block_hash: [0u8; 32],
        }
    }
}

impl ExecutionBlock {
    pub(crate) fn push_values(&self, values: &mut Vec<Value>) {
        values.extend([
            bytes_value(&self.parent_hash),
            bytes_value(&self.fee_recipient),
            bytes_value(&self.state_root),
            bytes_value(&self.receipts_root),
            bytes_value(&self.logs_bloom),
            bytes_value(&self.prev_randao),
            Value::uint(self.block_number),
            Value::uint(self.gas_limit),
            Value::uint(self.gas_used),
            Value::uint(self.timestamp),
            bytes_value(&self.extra_data),
            Value::Uint(self.base_fee_per_gas),
            bytes_value(&self.block_hash),
        ]);
    }

    pub(crate) fn read(fields: &mut FieldReader) -> Result<Self> {
        Ok(ExecutionBlock {
            parent_hash: fields.fixed()?,
            fee_recipient: fields.fixed()?,
            state_root: fields.fixed()?,
            receipts_root: fields.fixed()?,
            logs_bloom: fields.fixed()?,
            prev_randao: fields.fixed()?,
            block_number: fields.u64()?,
            gas_limit: fields.u64()?,
            gas_used: fields.u64()?,
            timestamp: fields.u64()?,
            extra_data: fields.bytes()?,
            base_fee_per_gas: fields.uint()?,
            block_hash: fields.fixed()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPayload {
    pub block: ExecutionBlock,
    pub transactions: Vec<Transaction>,
}

impl ExecutionPayload {
    /// Header committing to this payload's transactions by root.
    pub fn to_header(&self) -> Result<ExecutionPayloadHeader> {
        Ok(ExecutionPayloadHeader {
            block: self.block.clone(),
            transactions_root: transactions_root(&self.transactions)?,
        })
    }
}

/// Root of a transaction list, as committed to by a payload header.
pub fn transactions_root(transactions: &[Transaction]) -> Result<Root> {
    let value = Value::List(transactions.iter().map(|tx| bytes_value(tx)).collect());
    merkle::value_root(&transactions_kind(), &value)
}

impl SszContainer for ExecutionPayload {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(execution_payload_schema)
    }

    fn to_record(&self) -> Record {
        let mut values = Vec::with_capacity(14);
        self.block.push_values(&mut values);
        values.push(Value::List(
            self.transactions.iter().map(|tx| bytes_value(tx)).collect(),
        ));
        Record::new(values)
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(ExecutionPayload {
            block: ExecutionBlock::read(&mut fields)?,
            transactions: byte_items(fields.items()?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPayloadHeader {
    pub block: ExecutionBlock,
    pub transactions_root: Root,
}

impl SszContainer for ExecutionPayloadHeader {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(execution_payload_header_schema)
    }

    fn to_record(&self) -> Record {
        let mut values = Vec::with_capacity(14);
        self.block.push_values(&mut values);
        values.push(bytes_value(&self.transactions_root));
        Record::new(values)
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(ExecutionPayloadHeader {
            block: ExecutionBlock::read(&mut fields)?,
            transactions_root: fields.fixed()?,
        })
    }
}

impl_yaml_display!(ExecutionPayload, ExecutionPayloadHeader);
