//! Offset slots and offset tables
//!
//! Every variable-size value is referenced from the fixed part of its enclosing
//! region by a 4-byte little-endian offset, measured from the start of that
//! region. A list of variable-size items is itself a region that opens with one
//! offset per item.
//!
//! Validation rules shared by containers and lists:
//! - the first offset must equal the size of the fixed part;
//! - offsets never decrease;
//! - no offset points past the end of the region.

use crate::constants::{BYTES_PER_LENGTH_OFFSET, MAX_OFFSET};
use crate::error::{CodecError, Result};
use std::ops::Range;

/// Append an offset slot.
pub fn write_offset(buf: &mut Vec<u8>, offset: usize) -> Result<()> {
    if offset > MAX_OFFSET {
        return Err(CodecError::ItemTooLarge {
            len: offset,
            max: MAX_OFFSET,
        });
    }
    buf.extend_from_slice(&(offset as u32).to_le_bytes());
    Ok(())
}

/// Read the offset slot starting at `at`.
pub fn read_offset(data: &[u8], at: usize) -> Result<usize> {
    let end = at + BYTES_PER_LENGTH_OFFSET;
    if data.len() < end {
        return Err(CodecError::ShortBuffer {
            needed: end,
            actual: data.len(),
        });
    }
    let offset = u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
    Ok(offset as usize)
}

/// Number of items in a region holding a list of variable-size items.
///
/// The count is derived from the first offset and checked against `max`
/// before anything is allocated for the items.
pub fn dynamic_item_count(region: &[u8], max: usize) -> Result<usize> {
    if region.is_empty() {
        return Ok(0);
    }
    let first = read_offset(region, 0)?;
    if first > region.len() {
        return Err(CodecError::BadOffset {
            offset: first,
            previous: 0,
            len: region.len(),
        });
    }
    if first == 0 || first % BYTES_PER_LENGTH_OFFSET != 0 {
        // Closest valid table size that could have produced this offset.
        let expected = (first / BYTES_PER_LENGTH_OFFSET).max(1) * BYTES_PER_LENGTH_OFFSET;
        return Err(CodecError::InvalidVariableOffset {
            expected,
            actual: first,
        });
    }
    let count = first / BYTES_PER_LENGTH_OFFSET;
    if count > max {
        return Err(CodecError::ListTooLong { count, max });
    }
    Ok(count)
}

/// Byte ranges of the `count` items of a list-of-variable-items region.
///
/// `count` must already be bounded (see [`dynamic_item_count`]).
pub fn item_ranges(region: &[u8], count: usize) -> Result<Vec<Range<usize>>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let table_size = count * BYTES_PER_LENGTH_OFFSET;
    if region.len() < table_size {
        return Err(CodecError::ShortBuffer {
            needed: table_size,
            actual: region.len(),
        });
    }
    let mut offsets = Vec::with_capacity(count);
    for i in 0..count {
        offsets.push(read_offset(region, i * BYTES_PER_LENGTH_OFFSET)?);
    }
    if offsets[0] != table_size {
        return Err(CodecError::InvalidVariableOffset {
            expected: table_size,
            actual: offsets[0],
        });
    }
    ranges_from_offsets(&offsets, region.len())
}

/// Turn a validated-start offset list into consecutive payload ranges.
///
/// Item `i` spans `[offsets[i], offsets[i + 1])`; the last item runs to `end`.
pub fn ranges_from_offsets(offsets: &[usize], end: usize) -> Result<Vec<Range<usize>>> {
    let mut previous = 0;
    for &offset in offsets {
        if offset > end || offset < previous {
            return Err(CodecError::BadOffset {
                offset,
                previous,
                len: end,
            });
        }
        previous = offset;
    }
    let ranges = offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| start..offsets.get(i + 1).copied().unwrap_or(end))
        .collect();
    Ok(ranges)
}
