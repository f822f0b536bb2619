//! Binary codec edge cases
//!
//! Offset-table validation, declared maxima and the fixed-size layouts of
//! representative records.

use consensus_codec::container::SszContainer;
use consensus_codec::forks::bellatrix::{ExecutionBlock, ExecutionPayload};
use consensus_codec::forks::phase0::{BeaconBlockHeader, Checkpoint, SignedBeaconBlockHeader};
use consensus_codec::serialization::binary::{deserialize, serialize, serialized_size};
use consensus_codec::{CodecError, FieldKind, Record, Schema, Value};

fn pair_schema(max: usize) -> Schema {
    Schema::new("Pair")
        .field("number", FieldKind::Uint(8))
        .field("left", FieldKind::VariableBytes(max))
        .field("right", FieldKind::VariableBytes(max))
}

fn pair_bytes() -> Vec<u8> {
    let record = Record::new(vec![
        Value::uint(1u64),
        Value::bytes(vec![1, 2]),
        Value::bytes(vec![3]),
    ]);
    serialize(&pair_schema(8), &record).unwrap()
}

fn set_offset(bytes: &mut [u8], at: usize, offset: u32) {
    bytes[at..at + 4].copy_from_slice(&offset.to_le_bytes());
}

#[test]
fn test_signed_header_is_fixed_length_without_offsets() {
    let data: Vec<u8> = (0..208u32).map(|i| i as u8).collect();
    let signed = SignedBeaconBlockHeader::from_ssz(&data).unwrap();
    assert_eq!(signed.message.slot, u64::from_le_bytes([0, 1, 2, 3, 4, 5, 6, 7]));
    assert_eq!(signed.signature[0], 112);
    assert_eq!(signed.to_ssz().unwrap(), data);
    assert_eq!(signed.ssz_size().unwrap(), 208);
}

#[test]
fn test_pair_layout() {
    let bytes = pair_bytes();
    assert_eq!(bytes.len(), 19);
    assert_eq!(&bytes[8..12], &16u32.to_le_bytes());
    assert_eq!(&bytes[12..16], &18u32.to_le_bytes());
    assert_eq!(&bytes[16..], &[1, 2, 3]);
}

#[test]
fn test_short_buffer() {
    let bytes = pair_bytes();
    assert_eq!(
        deserialize(&pair_schema(8), &bytes[..10]),
        Err(CodecError::ShortBuffer {
            needed: 16,
            actual: 10
        })
    );
    assert_eq!(
        Checkpoint::from_ssz(&[0u8; 39]),
        Err(CodecError::ShortBuffer {
            needed: 40,
            actual: 39
        })
    );
}

#[test]
fn test_fixed_record_rejects_trailing_bytes() {
    assert_eq!(
        Checkpoint::from_ssz(&[0u8; 41]),
        Err(CodecError::TrailingBytes {
            expected: 40,
            actual: 41
        })
    );
}

#[test]
fn test_first_offset_must_match_fixed_part() {
    let mut bytes = pair_bytes();
    set_offset(&mut bytes, 8, 15);
    assert_eq!(
        deserialize(&pair_schema(8), &bytes),
        Err(CodecError::InvalidVariableOffset {
            expected: 16,
            actual: 15
        })
    );
}

#[test]
fn test_decreasing_offset() {
    let mut bytes = pair_bytes();
    set_offset(&mut bytes, 12, 15);
    assert_eq!(
        deserialize(&pair_schema(8), &bytes),
        Err(CodecError::BadOffset {
            offset: 15,
            previous: 16,
            len: 19
        })
    );
}

#[test]
fn test_offset_past_end() {
    let mut bytes = pair_bytes();
    set_offset(&mut bytes, 12, 20);
    assert_eq!(
        deserialize(&pair_schema(8), &bytes),
        Err(CodecError::BadOffset {
            offset: 20,
            previous: 16,
            len: 19
        })
    );
}

#[test]
fn test_equal_offsets_give_empty_payload() {
    let mut bytes = pair_bytes();
    set_offset(&mut bytes, 12, 16);
    let record = deserialize(&pair_schema(8), &bytes).unwrap();
    assert_eq!(record.get(1), Some(&Value::bytes(Vec::new())));
    assert_eq!(record.get(2), Some(&Value::bytes(vec![1, 2, 3])));
}

#[test]
fn test_item_too_large() {
    assert_eq!(
        deserialize(&pair_schema(1), &pair_bytes()),
        Err(CodecError::ItemTooLarge { len: 2, max: 1 })
    );
}

fn entries_schema(max: usize) -> Schema {
    Schema::new("Entries")
        .field("tag", FieldKind::Uint(2))
        .field("entries", FieldKind::list(FieldKind::VariableBytes(4), max))
}

#[test]
fn test_list_of_variable_items_too_long() {
    let record = Record::new(vec![
        Value::uint(9u16),
        Value::List(vec![
            Value::bytes(vec![1]),
            Value::bytes(vec![2]),
            Value::bytes(vec![3]),
        ]),
    ]);
    let bytes = serialize(&entries_schema(3), &record).unwrap();
    assert_eq!(deserialize(&entries_schema(3), &bytes).unwrap(), record);
    assert_eq!(
        deserialize(&entries_schema(2), &bytes),
        Err(CodecError::ListTooLong { count: 3, max: 2 })
    );
}

#[test]
fn test_list_count_is_bounded_before_allocation() {
    // Fixed part: uint16 tag plus one offset slot.
    let mut bytes = vec![0u8; 6];
    set_offset(&mut bytes, 2, 6);
    // Item table claims a billion entries but the region is only 4 bytes.
    bytes.extend_from_slice(&0x4000_0000u32.to_le_bytes());
    assert_eq!(
        deserialize(&entries_schema(2), &bytes),
        Err(CodecError::BadOffset {
            offset: 0x4000_0000,
            previous: 0,
            len: 4
        })
    );
}

#[test]
fn test_list_item_offset_not_multiple_of_four() {
    let mut bytes = vec![0u8; 6];
    set_offset(&mut bytes, 2, 6);
    bytes.extend_from_slice(&[6, 0, 0, 0, 0, 0, 0xaa]);
    assert!(matches!(
        deserialize(&entries_schema(4), &bytes),
        Err(CodecError::InvalidVariableOffset { actual: 6, .. })
    ));
}

#[test]
fn test_misaligned_list_of_fixed_items() {
    let schema = Schema::new("Numbers").field("values", FieldKind::list(FieldKind::Uint(8), 4));
    let mut bytes = 4u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 9]);
    assert_eq!(
        deserialize(&schema, &bytes),
        Err(CodecError::MisalignedList {
            len: 9,
            item_size: 8
        })
    );
}

#[test]
fn test_encode_rejects_oversize_values() {
    let record = Record::new(vec![
        Value::uint(1u64),
        Value::bytes(vec![0u8; 9]),
        Value::bytes(vec![]),
    ]);
    assert_eq!(
        serialize(&pair_schema(8), &record),
        Err(CodecError::ItemTooLarge { len: 9, max: 8 })
    );
}

#[test]
fn test_payload_transactions_round_trip() {
    let payload = ExecutionPayload {
        block: ExecutionBlock {
            extra_data: b"consensus".to_vec(),
            ..ExecutionBlock::default()
        },
        transactions: vec![
            vec![0x02, 0xf8, 0x72],
            Vec::new(),
            vec![0xaa; 300],
            vec![0x01],
        ],
    };
    let bytes = payload.to_ssz().unwrap();
    assert_eq!(
        bytes.len(),
        serialized_size(ExecutionPayload::schema(), &payload.to_record()).unwrap()
    );
    let decoded = ExecutionPayload::from_ssz(&bytes).unwrap();
    assert_eq!(decoded, payload);
    assert_eq!(decoded.to_ssz().unwrap(), bytes);
}

#[test]
fn test_header_round_trip_preserves_bytes() {
    let header = BeaconBlockHeader {
        slot: u64::MAX,
        proposer_index: 42,
        parent_root: [0xab; 32],
        state_root: [0xcd; 32],
        body_root: [0xef; 32],
    };
    let bytes = header.to_ssz().unwrap();
    assert_eq!(BeaconBlockHeader::from_ssz(&bytes).unwrap().to_ssz().unwrap(), bytes);
}
