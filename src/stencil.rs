//! The toppling rule.
//!
//! A cell keeps its grain count modulo 4 and receives one grain from each
//! orthogonal neighbour per multiple of 4 that neighbour held. Reading only
//! `src` makes every cell independent, so any subset of rows can be
//! evaluated concurrently as long as the writes are disjoint.

/// New value of the cell at flat index `idx` in a padded buffer of row length `stride`.
#[inline]
pub fn topple(src: &[u32], idx: usize, stride: usize) -> u32 {
    src[idx] % 4
        + src[idx - stride] / 4
        + src[idx + stride] / 4
        + src[idx - 1] / 4
        + src[idx + 1] / 4
}

/// Applies [`topple`] to interior columns of padded row `i`, writing into `dst_row`.
///
/// Returns whether any written cell differs from its value in `src`.
#[inline]
pub fn update_row(src: &[u32], dst_row: &mut [u32], i: usize, stride: usize) -> bool {
    let mut changed = false;
    for j in 1..stride - 1 {
        let idx = i * stride + j;
        let value = topple(src, idx, stride);
        changed |= value != src[idx];
        dst_row[j] = value;
    }
    changed
}
