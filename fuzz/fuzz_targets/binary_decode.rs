#![no_main]
use consensus_codec::forks::{bellatrix, capella, phase0};
use consensus_codec::merkle::hash_tree_root;
use consensus_codec::schema::Schema;
use consensus_codec::serialization::binary::{deserialize, serialize};
use libfuzzer_sys::fuzz_target;

fn check(schema: &Schema, data: &[u8]) {
    // Anything that decodes must re-encode to the same bytes and hash cleanly.
    if let Ok(record) = deserialize(schema, data) {
        let encoded = serialize(schema, &record).expect("decoded record must encode");
        assert_eq!(encoded, data, "re-encoding must reproduce input");
        hash_tree_root(schema, &record).expect("decoded record must hash");
    }
}

fuzz_target!(|data: &[u8]| {
    check(&phase0::signed_beacon_block_header_schema(), data);
    check(&bellatrix::execution_payload_schema(), data);
    check(&capella::execution_payload_schema(), data);
});
