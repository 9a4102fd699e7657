//! Blob Heap (`#Blob`) builder
//!
//! Builds the ECMA-335 `#Blob` heap, which stores binary data such as signatures, marshalling
//! descriptors and custom attribute values.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::io::Write;

use rustc_hash::FxHashMap;

use crate::{
    heaps::{advance_offset, Heap, HeapBase},
    utils::{compressed_uint_size, write_compressed_uint, MAX_COMPRESSED_UINT},
    Error, Result,
};

/// Builder for the `#Blob` heap.
///
/// Each entry is its size encoded as a compressed unsigned integer, followed by the bytes:
///
/// * If the first one byte of the 'blob' is 0bbbbbbb, then the rest of the 'blob' contains the
///   bbbbbbb bytes of actual data.
/// * If the first two bytes of the 'blob' are 10bbbbbb and x, then the rest of the 'blob'
///   contains the (bbbbbb << 8 + x) bytes of actual data.
/// * If the first four bytes of the 'blob' are 110bbbbb, x, y, and z, then the rest of the
///   'blob' contains the (bbbbb << 24 + x << 16 + y << 8 + z) bytes of actual data.
///
/// Offset 0 holds a single `0x00` byte, the empty blob.
///
/// # Examples
///
/// ```rust
/// use cilheaps::{BlobHeap, Heap};
///
/// let mut blobs = BlobHeap::new();
/// let signature = blobs.add(&[0x06, 0x08])?;
/// assert_eq!(signature, 1);
/// assert_eq!(blobs.to_bytes()?, [0x00, 0x02, 0x06, 0x08]);
/// # Ok::<(), cilheaps::Error>(())
/// ```
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.4
///
#[derive(Debug, Clone)]
pub struct BlobHeap {
    base: HeapBase,
    /// Entries with their offsets, in insertion order
    entries: Vec<(u32, Box<[u8]>)>,
    offsets: FxHashMap<Box<[u8]>, u32>,
    next_offset: u32,
}

impl BlobHeap {
    /// Creates an empty `#Blob` heap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty `#Blob` heap with room for `capacity` distinct entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BlobHeap {
            base: HeapBase::new(1),
            entries: Vec::with_capacity(capacity),
            offsets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_offset: 1,
        }
    }

    /// Adds a blob and returns its offset within the heap.
    ///
    /// Empty blobs map to offset 0 and do not change the heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::HeapOverflow`] if `data` is longer than `0x1FFF_FFFF` bytes,
    /// or the heap would exceed its 32-bit limit.
    pub fn add(&mut self, data: &[u8]) -> Result<u32> {
        if data.is_empty() {
            return Ok(0);
        }

        if let Some(&offset) = self.offsets.get(data) {
            return Ok(offset);
        }

        let length = match u32::try_from(data.len()) {
            Ok(length) if length <= MAX_COMPRESSED_UINT => length,
            _ => {
                log::warn!("#Blob rejected entry of {} bytes", data.len());
                return Err(Error::HeapOverflow {
                    heap: "#Blob",
                    length: data.len() as u64,
                });
            }
        };

        let offset = self.next_offset;
        self.next_offset = advance_offset(
            self.name(),
            offset,
            u64::from(compressed_uint_size(length)) + u64::from(length),
        )?;

        let entry: Box<[u8]> = data.into();
        self.offsets.insert(entry.clone(), offset);
        self.entries.push((offset, entry));

        log::trace!("#Blob entry at {}", offset);
        Ok(offset)
    }

    /// Returns the blob stored at `offset`.
    ///
    /// Offset 0 yields the empty blob. Offsets that do not start an entry yield `None`.
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

    /// Returns the offset of `data`, if it was added before.
    #[must_use]
    pub fn find(&self, data: &[u8]) -> Option<u32> {
        if data.is_empty() {
            return Some(0);
        }
        self.offsets.get(data).copied()
    }

    /// Number of distinct entries, not counting the placeholder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(offset, blob)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.entries.iter().map(|(offset, entry)| (*offset, &**entry))
    }
}

impl Default for BlobHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap for BlobHeap {
    fn name(&self) -> &'static str {
        "#Blob"
    }

    fn length(&self) -> u32 {
        self.next_offset
    }

    fn write_to(&self, sink: &mut dyn Write) -> Result<()> {
        log::debug!("Writing #Blob heap, {} bytes", self.length());

        sink.write_all(&[0])?;

        let mut prefix = Vec::with_capacity(4);
        for (_, entry) in &self.entries {
            prefix.clear();
            #[allow(clippy::cast_possible_truncation)]
            write_compressed_uint(entry.len() as u32, &mut prefix);

            sink.write_all(&prefix)?;
            sink.write_all(entry)?;
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
