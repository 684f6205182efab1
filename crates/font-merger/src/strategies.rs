//! Per-field merge rules, after fontTools.merge.util.

use crate::{MergeError, Result};

/// All values must agree; returns the shared value.
pub fn equal<T: PartialEq + Clone>(
    values: &[T],
    table: &'static str,
    field: &'static str,
) -> Result<T> {
    let (first, rest) = values.split_first().ok_or(MergeError::NoFonts)?;
    if rest.iter().all(|v| v == first) {
        Ok(first.clone())
    } else {
        Err(MergeError::NotEqual { table, field })
    }
}

pub fn first<T: Clone>(values: &[T]) -> Result<T> {
    values.first().cloned().ok_or(MergeError::NoFonts)
}

pub fn max<T: Ord + Clone>(values: &[T]) -> Result<T> {
    values.iter().max().cloned().ok_or(MergeError::NoFonts)
}

pub fn min<T: Ord + Clone>(values: &[T]) -> Result<T> {
    values.iter().min().cloned().ok_or(MergeError::NoFonts)
}

/// Union of bit sets.
pub fn bit_or(values: impl IntoIterator<Item = u32>) -> u32 {
    values.into_iter().fold(0, |acc, v| acc | v)
}

/// Merge a 16-bit flag word bit by bit.
///
/// `Some(true)` ORs the bit across fonts, `Some(false)` ANDs it, `None` takes
/// it from the first font.
pub fn merge_bits(values: &[u16], bit_map: &[Option<bool>; 16]) -> Result<u16> {
    let first = *values.first().ok_or(MergeError::NoFonts)?;

    let merged = bit_map.iter().enumerate().fold(0u16, |acc, (bit, mode)| {
        let mask = 1u16 << bit;
        let set = match mode {
            Some(true) => values.iter().any(|v| v & mask != 0),
            Some(false) => values.iter().all(|v| v & mask != 0),
            None => first & mask != 0,
        };
        if set { acc | mask } else { acc }
    });
    Ok(merged)
}
