//! Consensus-layer constants that feed schema construction

/// Merkle leaf granularity in bytes
pub const BYTES_PER_CHUNK: usize = 32;

/// Width of an offset slot in the fixed part of a variable-size region
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

/// Largest value an offset slot can hold
pub const MAX_OFFSET: usize = u32::MAX as usize;

/// Fork version width
pub const VERSION_LENGTH: usize = 4;

/// Root / block-hash width
pub const ROOT_LENGTH: usize = 32;

/// BLS12-381 compressed signature width
pub const BLS_SIGNATURE_LENGTH: usize = 96;

/// Execution-layer address width
pub const EXECUTION_ADDRESS_LENGTH: usize = 20;

/// Logs bloom filter width
pub const BYTES_PER_LOGS_BLOOM: usize = 256;

/// Maximum `extra_data` length in an execution payload
pub const MAX_EXTRA_DATA_BYTES: usize = 32;

/// Maximum size of a single opaque transaction: 2**30
pub const MAX_BYTES_PER_TRANSACTION: usize = 1 << 30;

/// Maximum transactions in an execution payload: 2**20
pub const MAX_TRANSACTIONS_PER_PAYLOAD: usize = 1 << 20;

/// Maximum withdrawals in an execution payload (capella)
pub const MAX_WITHDRAWALS_PER_PAYLOAD: usize = 16;
