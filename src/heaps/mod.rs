//! Metadata heap builders.
//!
//! This module builds the four heap streams of the ECMA-335 metadata section, as defined in
//! §II.24.2:
//!
//! - **#Strings**: Null-terminated UTF-8 strings for identifiers (type names, method names, etc.)
//! - **#US (User Strings)**: Length-prefixed UTF-16 strings for string literals in code
//! - **#Blob**: Binary data with length-prefixed encoding (signatures, custom attribute values)
//! - **#GUID**: Array of 16-byte GUIDs (module identifiers)
//!
//! # Architecture
//!
//! Every heap implements the [`Heap`] trait and embeds a [`HeapBase`] carrying the state all
//! heaps share: the size of the reserved leading placeholder and the [`HeapPosition`] assigned
//! by the file layout.
//!
//! During metadata construction, entries are added and each insertion returns the offset (or
//! 1-based index for `#GUID`) that tables and signatures store. Equal values always yield the
//! same offset. Offsets are handed out from a single running counter and never change.
//!
//! Once all entries are known, the layout queries [`Heap::length`], assigns positions through
//! [`Heap::set_position`] and finally calls [`Heap::write_to`] for each heap.
//!
//! # Examples
//!
//! ```rust
//! use cilheaps::{Heap, StringHeap};
//!
//! let mut strings = StringHeap::new();
//! assert_eq!(strings.add_str("Foo")?, 1);
//! assert_eq!(strings.add_str("Bar")?, 5);
//! assert_eq!(strings.add_str("Foo")?, 1);
//!
//! assert_eq!(strings.length(), 9);
//! assert_eq!(strings.to_bytes()?, b"\0Foo\0Bar\0");
//! # Ok::<(), cilheaps::Error>(())
//! ```

use std::io::Write;

use crate::{Error, Result};

mod blob;
mod guid;
mod set;
mod strings;
mod userstrings;

pub use blob::BlobHeap;
pub use guid::GuidHeap;
pub use set::{HeapSizes, MetadataHeaps};
pub use strings::StringHeap;
pub use userstrings::{requires_special_handling, UserStringHeap};

/// Alignment of metadata streams, in bytes.
pub const HEAP_ALIGNMENT: u32 = 4;

/// Largest heap length that still has a 32-bit aligned length.
pub const MAX_HEAP_LENGTH: u32 = u32::MAX - (HEAP_ALIGNMENT - 1);

/// Advances a running heap offset by `entry_size`, rejecting lengths past [`MAX_HEAP_LENGTH`].
pub(crate) fn advance_offset(heap: &'static str, current: u32, entry_size: u64) -> Result<u32> {
    let length = u64::from(current) + entry_size;
    match u32::try_from(length) {
        Ok(next) if next <= MAX_HEAP_LENGTH => Ok(next),
        _ => {
            log::warn!("{} rejected entry of {} bytes, heap is full", heap, entry_size);
            Err(Error::HeapOverflow { heap, length })
        }
    }
}

/// Physical location of a heap stream, as assigned by the file layout.
///
/// The heaps never interpret these values; they only keep them for later queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapPosition {
    /// Offset of the stream within the output file
    pub file_offset: u32,
    /// Relative virtual address of the stream once loaded
    pub rva: u32,
}

/// State shared by all heap kinds.
#[derive(Debug, Clone)]
pub struct HeapBase {
    /// Size of the reserved entry at offset 0 (1 byte, or nothing for `#GUID`)
    placeholder_size: u32,
    position: Option<HeapPosition>,
}

impl HeapBase {
    /// Creates the shared state for a heap with the given placeholder size.
    #[must_use]
    pub fn new(placeholder_size: u32) -> Self {
        Self {
            placeholder_size,
            position: None,
        }
    }

    /// Size of the reserved leading placeholder, in bytes.
    #[must_use]
    pub fn placeholder_size(&self) -> u32 {
        self.placeholder_size
    }

    /// Returns true if a heap of `length` bytes holds no real entries.
    #[must_use]
    pub fn is_empty(&self, length: u32) -> bool {
        length <= self.placeholder_size
    }

    /// The position assigned by the file layout, if any.
    #[must_use]
    pub fn position(&self) -> Option<HeapPosition> {
        self.position
    }

    /// Records the position assigned by the file layout.
    pub fn set_position(&mut self, position: HeapPosition) {
        self.position = Some(position);
    }
}

/// Common contract of the metadata heaps.
///
/// Implementors provide their stream name, current length and serialization. Everything
/// else is derived from those and the embedded [`HeapBase`].
pub trait Heap {
    /// Name of the stream, as it appears in the metadata stream directory.
    fn name(&self) -> &'static str;

    /// Current serialized size of the heap in bytes, including the placeholder.
    ///
    /// Valid at any time; it never decreases.
    fn length(&self) -> u32;

    /// Writes exactly [`Heap::length`] bytes to `sink`.
    ///
    /// Writing does not change the heap, repeated calls produce identical output.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    fn write_to(&self, sink: &mut dyn Write) -> Result<()>;

    /// Shared heap state.
    fn base(&self) -> &HeapBase;

    /// Mutable access to the shared heap state.
    fn base_mut(&mut self) -> &mut HeapBase;

    /// Returns true if the heap holds nothing but its placeholder and may be omitted.
    fn is_empty(&self) -> bool {
        self.base().is_empty(self.length())
    }

    /// Records the file offset and RVA assigned to this heap by the layout.
    ///
    /// No validation is performed on the values.
    fn set_position(&mut self, file_offset: u32, rva: u32) {
        log::debug!(
            "{} placed at file offset 0x{:X}, rva 0x{:X}",
            self.name(),
            file_offset,
            rva
        );
        self.base_mut()
            .set_position(HeapPosition { file_offset, rva });
    }

    /// The position assigned by [`Heap::set_position`], if any.
    fn position(&self) -> Option<HeapPosition> {
        self.base().position()
    }

    /// Length rounded up to the 4-byte stream alignment.
    fn aligned_length(&self) -> u32 {
        self.length().next_multiple_of(HEAP_ALIGNMENT)
    }

    /// Returns true if references into this heap need 4-byte indices.
    fn is_large(&self) -> bool {
        self.length() > 0xFFFF
    }

    /// Width in bytes of table columns referencing this heap.
    fn index_size(&self) -> u8 {
        if self.is_large() {
            4
        } else {
            2
        }
    }

    /// Writes the heap followed by zero padding up to [`Heap::aligned_length`].
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    fn write_aligned_to(&self, sink: &mut dyn Write) -> Result<()> {
        self.write_to(sink)?;

        let padding = (self.aligned_length() - self.length()) as usize;
        sink.write_all(&[0u8; HEAP_ALIGNMENT as usize][..padding])?;
        Ok(())
    }

    /// Serializes the heap into a new buffer.
    ///
    /// # Errors
    /// Never fails for the in-memory sink; the result mirrors [`Heap::write_to`].
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.length() as usize);
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }
}
