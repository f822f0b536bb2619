#![no_main]
use consensus_codec::forks::{capella, phase0};
use consensus_codec::schema::Schema;
use consensus_codec::serialization::text::{from_json_str, to_json_string};
use consensus_codec::serialization::yaml::{from_yaml_str, to_yaml_string};
use libfuzzer_sys::fuzz_target;

fn check(schema: &Schema, input: &str) {
    // Canonical output must decode back to the same record.
    if let Ok(record) = from_json_str(schema, input) {
        let text = to_json_string(schema, &record).expect("decoded record must encode");
        let again = from_json_str(schema, &text).expect("canonical text must decode");
        assert_eq!(again, record);
    }
    if let Ok(record) = from_yaml_str(schema, input) {
        let text = to_yaml_string(schema, &record).expect("decoded record must encode");
        let again = from_yaml_str(schema, &text).expect("flow yaml must decode");
        assert_eq!(again, record);
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        check(&phase0::signed_beacon_block_header_schema(), input);
        check(&capella::execution_payload_schema(), input);
    }
});
