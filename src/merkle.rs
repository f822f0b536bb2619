//! Hash tree roots
//!
//! A value's root is built from 32-byte chunks:
//! - integers are packed little-endian and zero-padded to whole chunks;
//! - byte arrays are split into chunks, the last one zero-padded;
//! - composite items (byte arrays, containers, variable items) contribute
//!   their own root as one chunk;
//! - chunks are padded with zero chunks to the next power of two of the
//!   kind's chunk limit and hashed pairwise up to a single root;
//! - variable bytes and lists mix their length into the root, so short
//!   content never collides with zero-padded longer content;
//! - a container merkleizes its field roots in declared order.
//!
//! Declared maxima are checked before a value is hashed.

use crate::config::CodecLimits;
use crate::constants::BYTES_PER_CHUNK;
use crate::crypto::NodeHasher;
use crate::error::{CodecError, Result};
use crate::schema::{FieldKind, Schema};
use crate::types::{Hash, Record, Value};
use tracing::trace;

/// Deepest tree any `usize` limit can need, plus the leaf level.
const MAX_TREE_DEPTH: usize = usize::BITS as usize;

/// Lists at least this long hash their items on the rayon pool.
#[cfg(feature = "rayon")]
const PARALLEL_ITEM_THRESHOLD: usize = 64;

/// Root of a record.
pub fn hash_tree_root(schema: &Schema, record: &Record) -> Result<Hash> {
    hash_tree_root_with_limits(schema, record, &CodecLimits::default())
}

/// Root of a record, bounding nesting depth by `limits`.
pub fn hash_tree_root_with_limits(
    schema: &Schema,
    record: &Record,
    limits: &CodecLimits,
) -> Result<Hash> {
    schema.validate()?;
    Merkleizer::new(limits.max_nesting_depth).container(schema, record, 0)
}

/// Root of a single value of the given kind.
pub fn value_root(kind: &FieldKind, value: &Value) -> Result<Hash> {
    Merkleizer::new(CodecLimits::default().max_nesting_depth).value(kind, value, 0)
}

/// `zero_hashes(d)[i]` is the root of a tree of depth `i` whose leaves are all zero.
pub fn zero_hashes(depth: usize) -> Vec<Hash> {
    let hasher = NodeHasher::new();
    let mut hashes = Vec::with_capacity(depth + 1);
    hashes.push([0u8; 32]);
    for i in 0..depth {
        let next = hasher.hash_concat(&hashes[i], &hashes[i]);
        hashes.push(next);
    }
    hashes
}

/// Split bytes into 32-byte chunks, zero-padding the last one.
pub fn pack(bytes: &[u8]) -> Vec<Hash> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|c| {
            let mut chunk = [0u8; 32];
            chunk[..c.len()].copy_from_slice(c);
            chunk
        })
        .collect()
}

/// Merkleize chunks, padding to the next power of two of `limit`
/// (or of the chunk count when there is no limit).
pub fn merkleize(chunks: &[Hash], limit: Option<usize>) -> Result<Hash> {
    let limit = limit.unwrap_or(chunks.len());
    let depth = tree_depth(limit);
    Merkleizer::with_zero_hashes(zero_hashes(depth), 0).merkleize(chunks, limit)
}

/// Hash a root together with a length encoded as a 32-byte little-endian integer.
pub fn mix_in_length(root: &Hash, length: usize) -> Hash {
    let mut len_chunk = [0u8; 32];
    len_chunk[..8].copy_from_slice(&(length as u64).to_le_bytes());
    NodeHasher::new().hash_concat(root, &len_chunk)
}

fn tree_depth(limit: usize) -> usize {
    match limit.max(1).checked_next_power_of_two() {
        Some(width) => width.trailing_zeros() as usize,
        None => MAX_TREE_DEPTH,
    }
}

/// Number of chunks needed for `bytes` bytes.
fn chunk_count(bytes: usize) -> usize {
    bytes / BYTES_PER_CHUNK + usize::from(bytes % BYTES_PER_CHUNK != 0)
}

/// Per-call scratch state: the zero-hash ladder and the depth bound.
struct Merkleizer {
    zero: Vec<Hash>,
    hasher: NodeHasher,
    max_depth: usize,
}

impl Merkleizer {
    fn new(max_depth: usize) -> Self {
        Self::with_zero_hashes(zero_hashes(MAX_TREE_DEPTH), max_depth)
    }

    fn with_zero_hashes(zero: Vec<Hash>, max_depth: usize) -> Self {
        Merkleizer {
            zero,
            hasher: NodeHasher::new(),
            max_depth,
        }
    }

    fn merkleize(&self, chunks: &[Hash], limit: usize) -> Result<Hash> {
        if chunks.len() > limit {
            return Err(CodecError::ListSizeExceeded {
                count: chunks.len(),
                limit,
            });
        }
        let depth = tree_depth(limit);
        trace!(target: "consensus_codec::merkle", chunks = chunks.len(), limit, depth, "merkleize");
        if chunks.is_empty() {
            return Ok(self.zero[depth]);
        }
        let mut layer = chunks.to_vec();
        for level in 0..depth {
            if layer.len() % 2 == 1 {
                layer.push(self.zero[level]);
            }
            layer = layer
                .chunks_exact(2)
                .map(|pair| self.hasher.hash_concat(&pair[0], &pair[1]))
                .collect();
        }
        Ok(layer[0])
    }

    fn container(&self, schema: &Schema, record: &Record, depth: usize) -> Result<Hash> {
        if depth > self.max_depth {
            return Err(CodecError::NestingTooDeep {
                max: self.max_depth,
            });
        }
        if record.len() != schema.fields().len() {
            return Err(CodecError::mismatch(format!(
                "{}: expected {} fields, got {}",
                schema.name(),
                schema.fields().len(),
                record.len()
            )));
        }
        let mut roots = Vec::with_capacity(record.len());
        for (field, value) in schema.fields().iter().zip(record.values()) {
            roots.push(self.value(field.kind(), value, depth)?);
        }
        self.merkleize(&roots, roots.len())
    }

    fn value(&self, kind: &FieldKind, value: &Value, depth: usize) -> Result<Hash> {
        match (kind, value) {
            (FieldKind::Uint(w), Value::Uint(u)) => {
                if !u.fits_width(*w) {
                    return Err(CodecError::mismatch(format!(
                        "value {u} does not fit in {w} bytes"
                    )));
                }
                Ok(u.to_le_bytes())
            }
            (FieldKind::FixedBytes(n), Value::Bytes(b)) => {
                if b.len() != *n {
                    return Err(CodecError::mismatch(format!(
                        "expected {n} bytes, got {}",
                        b.len()
                    )));
                }
                self.merkleize(&pack(b), chunk_count(*n))
            }
            (FieldKind::VariableBytes(max), Value::Bytes(b)) => {
                if b.len() > *max {
                    return Err(CodecError::ListSizeExceeded {
                        count: b.len(),
                        limit: *max,
                    });
                }
                let root = self.merkleize(&pack(b), chunk_count(*max))?;
                Ok(mix_in_length(&root, b.len()))
            }
            (FieldKind::Vector(item, n), Value::Vector(items)) => {
                if items.len() != *n {
                    return Err(CodecError::mismatch(format!(
                        "vector needs {n} items, got {}",
                        items.len()
                    )));
                }
                self.items_root(item, items, *n, depth)
            }
            (FieldKind::List(item, max), Value::List(items)) => {
                if items.len() > *max {
                    return Err(CodecError::ListSizeExceeded {
                        count: items.len(),
                        limit: *max,
                    });
                }
                let root = self.items_root(item, items, *max, depth)?;
                Ok(mix_in_length(&root, items.len()))
            }
            (FieldKind::Container(schema), Value::Container(record)) => {
                self.container(schema, record, depth + 1)
            }
            (kind, value) => Err(CodecError::mismatch(format!(
                "{} value for {} field",
                value.kind_name(),
                kind.name()
            ))),
        }
    }

    /// Root of a sequence of items, before any length mixin.
    ///
    /// `bound` is the item count for vectors and the maximum for lists.
    fn items_root(&self, item: &FieldKind, items: &[Value], bound: usize, depth: usize) -> Result<Hash> {
        if depth + 1 > self.max_depth {
            return Err(CodecError::NestingTooDeep {
                max: self.max_depth,
            });
        }
        if item.is_basic() {
            let width = item.inline_size();
            let mut packed = Vec::with_capacity(items.len() * width);
            for v in items {
                match v {
                    Value::Uint(u) if u.fits_width(width) => {
                        packed.extend_from_slice(&u.to_le_bytes()[..width]);
                    }
                    other => {
                        return Err(CodecError::mismatch(format!(
                            "{} item in uint{} sequence",
                            other.kind_name(),
                            width * 8
                        )))
                    }
                }
            }
            self.merkleize(&pack(&packed), chunk_count(bound.saturating_mul(width)))
        } else {
            let roots = self.item_roots(item, items, depth + 1)?;
            self.merkleize(&roots, bound)
        }
    }

    fn item_roots(&self, item: &FieldKind, items: &[Value], depth: usize) -> Result<Vec<Hash>> {
        #[cfg(feature = "rayon")]
        {
            if items.len() >= PARALLEL_ITEM_THRESHOLD {
                use rayon::prelude::*;
                return items
                    .par_iter()
                    .map(|v| self.value(item, v, depth))
                    .collect();
            }
        }
        items.iter().map(|v| self.value(item, v, depth)).collect()
    }
}
