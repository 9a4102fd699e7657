//! String Heap (`#Strings`) builder
//!
//! Builds the ECMA-335 `#Strings` heap, which stores identifier strings in UTF-8 encoding.
//!
//! # Format
//! - Offset 0 holds a single `0x00` byte and stands for the empty / absent string
//! - Every entry is its raw bytes followed by a `0x00` terminator
//! - Entries are written in insertion order
//!
//! # Reference
//! - [ECMA-335 II.24.2.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::io::Write;

use rustc_hash::FxHashMap;

use crate::{
    heaps::{advance_offset, Heap, HeapBase},
    Result,
};

/// Builder for the `#Strings` heap.
///
/// Identical strings are stored once; adding a string that is already present returns the
/// offset it was first assigned.
///
/// # Examples
///
/// ```rust
/// use cilheaps::{Heap, StringHeap};
///
/// let mut strings = StringHeap::new();
/// let name = strings.add_str("<Module>")?;
/// assert_eq!(name, 1);
/// assert_eq!(strings.get(name), Some(&b"<Module>"[..]));
/// assert_eq!(strings.length(), 10);
/// # Ok::<(), cilheaps::Error>(())
/// ```
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.3
///
#[derive(Debug, Clone)]
pub struct StringHeap {
    base: HeapBase,
    /// Entries with their offsets, in insertion order
    entries: Vec<(u32, Box<[u8]>)>,
    offsets: FxHashMap<Box<[u8]>, u32>,
    next_offset: u32,
}

impl StringHeap {
    /// Creates an empty `#Strings` heap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty `#Strings` heap with room for `capacity` distinct entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        StringHeap {
            base: HeapBase::new(1),
            entries: Vec::with_capacity(capacity),
            offsets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_offset: 1,
        }
    }

    /// Adds a UTF-8 string and returns its offset within the heap.
    ///
    /// Empty values map to offset 0 and do not change the heap.
    ///
    /// ## Arguments
    /// * 'value' - The raw UTF-8 bytes to store, without terminator
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidEntry`] if `value` contains a NUL byte, or
    /// [`crate::Error::HeapOverflow`] if the heap would exceed its 32-bit limit.
    /// The heap is left unchanged in both cases.
    pub fn add(&mut self, value: &[u8]) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(&offset) = self.offsets.get(value) {
            return Ok(offset);
        }

        if let Some(position) = value.iter().position(|&b| b == 0) {
            log::warn!("#Strings rejected entry with NUL byte at {}", position);
            return Err(invalid_entry_error!(
                "#Strings entry contains a NUL byte at position {}",
                position
            ));
        }

        let offset = self.next_offset;
        self.next_offset = advance_offset(self.name(), offset, value.len() as u64 + 1)?;

        let entry: Box<[u8]> = value.into();
        self.offsets.insert(entry.clone(), offset);
        self.entries.push((offset, entry));

        log::trace!("#Strings entry at {}", offset);
        Ok(offset)
    }

    /// Adds a string slice, see [`StringHeap::add`].
    ///
    /// # Errors
    /// Same as [`StringHeap::add`].
    pub fn add_str(&mut self, value: &str) -> Result<u32> {
        self.add(value.as_bytes())
    }

    /// Returns the entry stored at `offset`.
    ///
    /// Offset 0 yields the empty entry. Offsets that do not start an entry yield `None`.
    #[must_use]
    pub fn get(&self, offset: u32) -> Option<&[u8]> {
        if offset == 0 {
            return Some(&[]);
        }

        self.entries
            .binary_search_by_key(&offset, |(entry_offset, _)| *entry_offset)
            .ok()
            .map(|index| &*self.entries[index].1)
    }

    /// Returns the offset of `value`, if it was added before.
    #[must_use]
    pub fn find(&self, value: &[u8]) -> Option<u32> {
        if value.is_empty() {
            return Some(0);
        }
        self.offsets.get(value).copied()
    }

    /// Number of distinct entries, not counting the placeholder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(offset, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.entries.iter().map(|(offset, entry)| (*offset, &**entry))
    }
}

impl Default for StringHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap for StringHeap {
    fn name(&self) -> &'static str {
        "#Strings"
    }

    fn length(&self) -> u32 {
        self.next_offset
    }

    fn write_to(&self, sink: &mut dyn Write) -> Result<()> {
        log::debug!("Writing #Strings heap, {} bytes", self.length());

        sink.write_all(&[0])?;
        for (_, entry) in &self.entries {
            sink.write_all(entry)?;
            sink.write_all(&[0])?;
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
