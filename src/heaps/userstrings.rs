//! User String Heap (`#US`) builder
//!
//! Builds the ECMA-335 `#US` heap, which stores user-defined string literals (the operands of
//! `ldstr`) in UTF-16 encoding.
//!
//! # Format
//! Each entry has the layout:
//! - Compressed length (1-4 bytes) of the remaining entry, i.e. `chars * 2 + 1`
//! - UTF-16 code units, little-endian
//! - Trailing flag byte (0x01 if any code unit needs special handling, else 0x00)
//!
//! Offset 0 holds a single `0x00` byte and stands for the empty string.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::io::Write;

use rustc_hash::FxHashMap;
use widestring::{U16Str, U16String};

use crate::{
    heaps::{advance_offset, Heap, HeapBase},
    utils::{compressed_uint_size, write_compressed_uint, MAX_COMPRESSED_UINT},
    Error, Result,
};

/// Returns true if the code unit requires the trailing flag byte to be set.
///
/// ECMA-335 II.24.2.4: set for any character with a non-zero top byte, and for the low
/// characters 0x01-0x08, 0x0E-0x1F, 0x27, 0x2D and 0x7F.
#[must_use]
pub fn requires_special_handling(unit: u16) -> bool {
    matches!(unit, 0x01..=0x08 | 0x0E..=0x1F | 0x27 | 0x2D | 0x7F) || unit > 0xFF
}

/// Builder for the `#US` heap.
///
/// Identical strings (by code unit sequence) are stored once.
///
/// # Examples
///
/// ```rust
/// use cilheaps::{Heap, UserStringHeap};
///
/// let mut us = UserStringHeap::new();
/// let hello = us.add_str("Hello, World!")?;
/// assert_eq!(hello, 1);
/// // 1 placeholder + 1 length byte + 26 bytes UTF-16 + 1 flag byte
/// assert_eq!(us.length(), 29);
/// # Ok::<(), cilheaps::Error>(())
/// ```
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.4
///
#[derive(Debug, Clone)]
pub struct UserStringHeap {
    base: HeapBase,
    /// Entries with their offsets, in insertion order
    entries: Vec<(u32, Box<[u16]>)>,
    offsets: FxHashMap<Box<[u16]>, u32>,
    next_offset: u32,
}

impl UserStringHeap {
    /// Creates an empty `#US` heap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty `#US` heap with room for `capacity` distinct entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        UserStringHeap {
            base: HeapBase::new(1),
            entries: Vec::with_capacity(capacity),
            offsets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_offset: 1,
        }
    }

    /// Adds a UTF-16 string and returns its offset within the heap.
    ///
    /// Empty values map to offset 0 and do not change the heap. Unpaired surrogates are
    /// stored as they are.
    ///
    /// ## Arguments
    /// * 'value' - The UTF-16 code units to store
    ///
    /// # Errors
    /// Returns [`crate::Error::HeapOverflow`] if the entry is longer than a compressed length
    /// can describe, or the heap would exceed its 32-bit limit.
    pub fn add(&mut self, value: &U16Str) -> Result<u32> {
        let units = value.as_slice();
        if units.is_empty() {
            return Ok(0);
        }

        if let Some(&offset) = self.offsets.get(units) {
            return Ok(offset);
        }

        let blob_length = Self::blob_length(units)?;
        let entry_size = u64::from(compressed_uint_size(blob_length)) + u64::from(blob_length);

        let offset = self.next_offset;
        self.next_offset = advance_offset(self.name(), offset, entry_size)?;

        let entry: Box<[u16]> = units.into();
        self.offsets.insert(entry.clone(), offset);
        self.entries.push((offset, entry));

        log::trace!("#US entry at {}", offset);
        Ok(offset)
    }

    /// Adds a string slice after encoding it to UTF-16, see [`UserStringHeap::add`].
    ///
    /// # Errors
    /// Same as [`UserStringHeap::add`].
    pub fn add_str(&mut self, value: &str) -> Result<u32> {
        self.add(&U16String::from_str(value))
    }

    /// Returns the string stored at `offset`.
    ///
    /// Offset 0 yields the empty string. Offsets that do not start an entry yield `None`.
    #[must_use]
    pub fn get(&self, offset: u32) -> Option<&U16Str> {
        if offset == 0 {
            return Some(U16Str::from_slice(&[]));
        }

        self.entries
            .binary_search_by_key(&offset, |(entry_offset, _)| *entry_offset)
            .ok()
            .map(|index| U16Str::from_slice(&self.entries[index].1))
    }

    /// Returns the offset of `value`, if it was added before.
    #[must_use]
    pub fn find(&self, value: &U16Str) -> Option<u32> {
        if value.is_empty() {
            return Some(0);
        }
        self.offsets.get(value.as_slice()).copied()
    }

    /// Number of distinct entries, not counting the placeholder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(offset, string)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &U16Str)> {
        self.entries
            .iter()
            .map(|(offset, entry)| (*offset, U16Str::from_slice(entry)))
    }

    /// Size of the entry following its length prefix: the UTF-16 bytes plus the flag byte.
    fn blob_length(units: &[u16]) -> Result<u32> {
        let length = (units.len() as u64) * 2 + 1;
        match u32::try_from(length) {
            Ok(length) if length <= MAX_COMPRESSED_UINT => Ok(length),
            _ => {
                log::warn!("#US rejected string of {} code units", units.len());
                Err(Error::HeapOverflow {
                    heap: "#US",
                    length,
                })
            }
        }
    }
}

impl Default for UserStringHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap for UserStringHeap {
    fn name(&self) -> &'static str {
        "#US"
    }

    fn length(&self) -> u32 {
        self.next_offset
    }

    fn write_to(&self, sink: &mut dyn Write) -> Result<()> {
        log::debug!("Writing #US heap, {} bytes", self.length());

        sink.write_all(&[0])?;

        let mut buffer = Vec::new();
        for (_, entry) in &self.entries {
            buffer.clear();

            // Length was validated when the entry was added
            write_compressed_uint(Self::blob_length(entry)?, &mut buffer);

            let mut special = false;
            for &unit in entry.iter() {
                buffer.extend_from_slice(&unit.to_le_bytes());
                special |= requires_special_handling(unit);
            }
            buffer.push(u8::from(special));

            sink.write_all(&buffer)?;
        }

        Ok(())
    }

    fn base(&self) -> &HeapBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HeapBase {
        &mut self.base
    }
}
