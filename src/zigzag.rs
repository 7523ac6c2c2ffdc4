//! Serpentine traversal order for square grids.
//!
//! Row 0 is walked left to right, row 1 right to left, and so on. The LED
//! panels this feeds are wired as one snake-shaped strip, so the matrix sent
//! downstream is laid out in strip order.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::matrix::{ChannelMatrix, ChannelSet};

/// A `(row, col)` coordinate in an N×N grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

pub type ZigzagIndexSequence = Arc<[GridIndex]>;

/// Sequences for sizes up to this are cached; larger ones are rebuilt per call.
pub const MAX_CACHED_SIZE: usize = 256;

static ZIGZAG_CACHE: OnceLock<RwLock<HashMap<usize, ZigzagIndexSequence>>> = OnceLock::new();

fn generate_zigzag(size: usize) -> Vec<GridIndex> {
    let cells = size
        .checked_mul(size)
        .unwrap_or_else(|| panic!("zigzag size {size} overflows the cell count"));
    let mut entries = Vec::with_capacity(cells);
    for row in 0..size {
        if row % 2 == 0 {
            entries.extend((0..size).map(|col| GridIndex { row, col }));
        } else {
            entries.extend((0..size).rev().map(|col| GridIndex { row, col }));
        }
    }
    entries
}

/// Return the traversal for `size`, computing it on first use.
///
/// Concurrent first requests may both compute the sequence; the results are
/// identical and only the first insert is kept. Sizes above
/// [`MAX_CACHED_SIZE`] are computed on every call and never stored.
///
/// # Panics
///
/// Panics if `size * size` overflows `usize`.
pub fn get_zigzag_indices(size: usize) -> ZigzagIndexSequence {
    if size > MAX_CACHED_SIZE {
        return generate_zigzag(size).into();
    }

    let cache = ZIGZAG_CACHE.get_or_init(Default::default);

    // A poisoned lock still holds valid sequences
    if let Some(hit) = cache
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&size)
    {
        return Arc::clone(hit);
    }

    log::trace!("computing zigzag indices for {size}x{size}");
    let fresh: ZigzagIndexSequence = generate_zigzag(size).into();
    let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(guard.entry(size).or_insert(fresh))
}

/// Reorder `values` so that destination cell `i` (row-major) receives the
/// value found at the `i`-th zigzag coordinate of the source.
///
/// # Panics
///
/// Panics if `values` is not `size`×`size`.
pub fn zigzag_to_matrix(values: &ChannelMatrix, size: usize) -> ChannelMatrix {
    assert_eq!(values.size(), size, "matrix size does not match zigzag size");

    let indices = get_zigzag_indices(size);
    let mut matrix = ChannelMatrix::new(size);
    for (i, index) in indices.iter().enumerate() {
        matrix.set(i / size, i % size, values.get(index.row, index.col));
    }
    matrix
}

/// Apply [`zigzag_to_matrix`] to all three channels.
pub fn zigzag_channels(channels: &ChannelSet) -> ChannelSet {
    let size = channels.size();
    channels.map_channels(|m| zigzag_to_matrix(m, size))
}
