//! capella records: validator withdrawals in execution payloads

use super::bellatrix::{payload_base, transactions_kind, ExecutionBlock};
use super::{byte_items, bytes_value, ExecutionAddress, Gwei, Transaction, ValidatorIndex, WithdrawalIndex};
use crate::constants::{EXECUTION_ADDRESS_LENGTH, MAX_WITHDRAWALS_PER_PAYLOAD};
use crate::container::SszContainer;
use crate::error::{CodecError, Result};
use crate::schema::{FieldKind, Schema};
use crate::types::{Record, Value};
use std::sync::OnceLock;

pub fn withdrawal_schema() -> Schema {
    Schema::new("Withdrawal")
        .field("index", FieldKind::Uint(8))
        .field("validator_index", FieldKind::Uint(8))
        .field("address", FieldKind::FixedBytes(EXECUTION_ADDRESS_LENGTH))
        .field("amount", FieldKind::Uint(8))
}

pub fn execution_payload_schema() -> Schema {
    payload_base("ExecutionPayload")
        .field("transactions", transactions_kind())
        .field(
            "withdrawals",
            FieldKind::list(
                FieldKind::Container(withdrawal_schema()),
                MAX_WITHDRAWALS_PER_PAYLOAD,
            ),
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Withdrawal {
    pub index: WithdrawalIndex,
    pub validator_index: ValidatorIndex,
    pub address: ExecutionAddress,
    pub amount: Gwei,
}

impl SszContainer for Withdrawal {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(withdrawal_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            Value::uint(self.index),
            Value::uint(self.validator_index),
            bytes_value(&self.address),
            Value::uint(self.amount),
        ])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(Withdrawal {
            index: fields.u64()?,
            validator_index: fields.u64()?,
            address: fields.fixed()?,
            amount: fields.u64()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPayload {
    pub block: ExecutionBlock,
    pub transactions: Vec<Transaction>,
    pub withdrawals: Vec<Withdrawal>,
}

impl SszContainer for ExecutionPayload {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(execution_payload_schema)
    }

    fn to_record(&self) -> Record {
        let mut values = Vec::with_capacity(15);
        self.block.push_values(&mut values);
        values.push(Value::List(
            self.transactions.iter().map(|tx| bytes_value(tx)).collect(),
        ));
        values.push(Value::List(
            self.withdrawals
                .iter()
                .map(|w| Value::Container(w.to_record()))
                .collect(),
        ));
        Record::new(values)
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        let block = ExecutionBlock::read(&mut fields)?;
        let transactions = byte_items(fields.items()?)?;
        let withdrawals = fields
            .items()?
            .into_iter()
            .map(|item| match item {
                Value::Container(r) => Withdrawal::from_record(r),
                other => Err(CodecError::mismatch(format!(
                    "{} item in withdrawal list",
                    other.kind_name()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ExecutionPayload {
            block,
            transactions,
            withdrawals,
        })
    }
}

impl_yaml_display!(Withdrawal, ExecutionPayload);
