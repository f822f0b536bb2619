use consensus_codec::container::SszContainer;
use consensus_codec::forks::bellatrix::{ExecutionBlock, ExecutionPayload};
use consensus_codec::forks::capella::{self, Withdrawal};
use consensus_codec::forks::phase0::{BeaconBlockHeader, SignedBeaconBlockHeader};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn signed_header() -> SignedBeaconBlockHeader {
    SignedBeaconBlockHeader {
        message: BeaconBlockHeader {
            slot: 7_000_000,
            proposer_index: 123_456,
            parent_root: [1u8; 32],
            state_root: [2u8; 32],
            body_root: [3u8; 32],
        },
        signature: [0x60; 96],
    }
}

/// A payload shaped like a busy mainnet block: 200 transactions of ~500 bytes.
fn payload() -> ExecutionPayload {
    ExecutionPayload {
        block: ExecutionBlock {
            extra_data: b"bench".to_vec(),
            ..ExecutionBlock::default()
        },
        transactions: (0..200).map(|i| vec![i as u8; 500]).collect(),
    }
}

fn capella_payload() -> capella::ExecutionPayload {
    let base = payload();
    capella::ExecutionPayload {
        block: base.block,
        transactions: base.transactions,
        withdrawals: (0..16)
            .map(|i| Withdrawal {
                index: i,
                validator_index: i * 3,
                address: [0x22; 20],
                amount: 32_000_000_000,
            })
            .collect(),
    }
}

fn benchmark_header(c: &mut Criterion) {
    let signed = signed_header();
    let bytes = signed.to_ssz().unwrap();
    let text = signed.to_json().unwrap();

    c.bench_function("signed_header_encode", |b| {
        b.iter(|| black_box(black_box(&signed).to_ssz()))
    });
    c.bench_function("signed_header_decode", |b| {
        b.iter(|| black_box(SignedBeaconBlockHeader::from_ssz(black_box(&bytes))))
    });
    c.bench_function("signed_header_root", |b| {
        b.iter(|| black_box(black_box(&signed).hash_tree_root()))
    });
    c.bench_function("signed_header_from_json", |b| {
        b.iter(|| black_box(SignedBeaconBlockHeader::from_json(black_box(&text))))
    });
}

fn benchmark_payload(c: &mut Criterion) {
    let payload = payload();
    let bytes = payload.to_ssz().unwrap();
    let text = payload.to_json().unwrap();

    c.bench_function("payload_encode", |b| {
        b.iter(|| black_box(black_box(&payload).to_ssz()))
    });
    c.bench_function("payload_decode", |b| {
        b.iter(|| black_box(ExecutionPayload::from_ssz(black_box(&bytes))))
    });
    c.bench_function("payload_root", |b| {
        b.iter(|| black_box(black_box(&payload).hash_tree_root()))
    });
    c.bench_function("payload_to_json", |b| {
        b.iter(|| black_box(black_box(&payload).to_json()))
    });
    c.bench_function("payload_from_json", |b| {
        b.iter(|| black_box(ExecutionPayload::from_json(black_box(&text))))
    });

    let capella = capella_payload();
    c.bench_function("capella_payload_root", |b| {
        b.iter(|| black_box(black_box(&capella).hash_tree_root()))
    });
}

criterion_group!(benches, benchmark_header, benchmark_payload);
criterion_main!(benches);
