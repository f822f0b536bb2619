//! phase0 records: fork metadata, checkpoints and block headers

use super::{bytes_value, BlsSignature, Epoch, Root, Slot, ValidatorIndex, Version};
use crate::constants::{BLS_SIGNATURE_LENGTH, ROOT_LENGTH, VERSION_LENGTH};
use crate::container::SszContainer;
use crate::error::Result;
use crate::schema::{AbsentPolicy, Field, FieldKind, Schema};
use crate::types::{Record, Value};
use std::sync::OnceLock;

pub fn fork_schema() -> Schema {
    Schema::new("Fork")
        .field("previous_version", FieldKind::FixedBytes(VERSION_LENGTH))
        .field("current_version", FieldKind::FixedBytes(VERSION_LENGTH))
        .field("epoch", FieldKind::Uint(8))
}

pub fn fork_data_schema() -> Schema {
    Schema::new("ForkData")
        .field("current_version", FieldKind::FixedBytes(VERSION_LENGTH))
        .field("genesis_validators_root", FieldKind::FixedBytes(ROOT_LENGTH))
}

pub fn checkpoint_schema() -> Schema {
    Schema::new("Checkpoint")
        .field("epoch", FieldKind::Uint(8))
        .field("root", FieldKind::FixedBytes(ROOT_LENGTH))
}

pub fn beacon_block_header_schema() -> Schema {
    Schema::new("BeaconBlockHeader")
        .field("slot", FieldKind::Uint(8))
        .field("proposer_index", FieldKind::Uint(8))
        .field("parent_root", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("state_root", FieldKind::FixedBytes(ROOT_LENGTH))
        .field("body_root", FieldKind::FixedBytes(ROOT_LENGTH))
}

/// An absent `signature` is read as empty and fails its length check, matching
/// published fixtures.
pub fn signed_beacon_block_header_schema() -> Schema {
    Schema::new("SignedBeaconBlockHeader")
        .field(
            "message",
            FieldKind::Container(beacon_block_header_schema()),
        )
        .with_field(
            Field::new("signature", FieldKind::FixedBytes(BLS_SIGNATURE_LENGTH))
                .with_absent_policy(AbsentPolicy::Empty),
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

impl SszContainer for Fork {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(fork_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            bytes_value(&self.previous_version),
            bytes_value(&self.current_version),
            Value::uint(self.epoch),
        ])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(Fork {
            previous_version: fields.fixed()?,
            current_version: fields.fixed()?,
            epoch: fields.u64()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForkData {
    pub current_version: Version,
    pub genesis_validators_root: Root,
}

impl ForkData {
    /// First four bytes of the fork data root, used to tag network messages.
    pub fn fork_digest(&self) -> Result<[u8; 4]> {
        let root = self.hash_tree_root()?;
        let mut digest = [0u8; 4];
        digest.copy_from_slice(&root[..4]);
        Ok(digest)
    }
}

impl SszContainer for ForkData {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(fork_data_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            bytes_value(&self.current_version),
            bytes_value(&self.genesis_validators_root),
        ])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(ForkData {
            current_version: fields.fixed()?,
            genesis_validators_root: fields.fixed()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

impl SszContainer for Checkpoint {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(checkpoint_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![Value::uint(self.epoch), bytes_value(&self.root)])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(Checkpoint {
            epoch: fields.u64()?,
            root: fields.fixed()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

impl SszContainer for BeaconBlockHeader {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(beacon_block_header_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            Value::uint(self.slot),
            Value::uint(self.proposer_index),
            bytes_value(&self.parent_root),
            bytes_value(&self.state_root),
            bytes_value(&self.body_root),
        ])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(BeaconBlockHeader {
            slot: fields.u64()?,
            proposer_index: fields.u64()?,
            parent_root: fields.fixed()?,
            state_root: fields.fixed()?,
            body_root: fields.fixed()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

impl Default for SignedBeaconBlockHeader {
    fn default() -> Self {
        SignedBeaconBlockHeader {
            message: BeaconBlockHeader::default(),
            signature: [0u8; BLS_SIGNATURE_LENGTH],
        }
    }
}

impl SszContainer for SignedBeaconBlockHeader {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(signed_beacon_block_header_schema)
    }

    fn to_record(&self) -> Record {
        Record::new(vec![
            Value::Container(self.message.to_record()),
            bytes_value(&self.signature),
        ])
    }

    fn from_record(record: Record) -> Result<Self> {
        let mut fields = record.into_fields();
        Ok(SignedBeaconBlockHeader {
            message: BeaconBlockHeader::from_record(fields.record()?)?,
            signature: fields.fixed()?,
        })
    }
}

impl_yaml_display!(Fork, ForkData, Checkpoint, BeaconBlockHeader, SignedBeaconBlockHeader);
