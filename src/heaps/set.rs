//! The full set of heaps of one metadata build.

use bitflags::bitflags;

use crate::heaps::{BlobHeap, GuidHeap, Heap, StringHeap, UserStringHeap};

bitflags! {
    /// `HeapSizes` byte of the `#~` stream header (ECMA-335 II.24.2.6).
    ///
    /// A set bit means references into that heap are 4 bytes wide instead of 2.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeapSizes: u8 {
        /// `#Strings` is larger than 0xFFFF bytes
        const LARGE_STRINGS = 0x01;
        /// `#GUID` is larger than 0xFFFF bytes
        const LARGE_GUID = 0x02;
        /// `#Blob` is larger than 0xFFFF bytes
        const LARGE_BLOB = 0x04;
    }
}

/// Owns the four heaps built for one metadata section.
///
/// Heaps are listed in the conventional stream order `#Strings`, `#US`, `#GUID`, `#Blob`.
///
/// # Examples
///
/// ```rust
/// use cilheaps::{Heap, MetadataHeaps};
///
/// let mut heaps = MetadataHeaps::new();
/// heaps.strings.add_str("<Module>")?;
/// heaps.blobs.add(&[0x20, 0x00, 0x01])?;
///
/// let names: Vec<_> = heaps.non_empty().map(|heap| heap.name()).collect();
/// assert_eq!(names, ["#Strings", "#Blob"]);
/// assert!(heaps.heap_sizes().is_empty());
/// # Ok::<(), cilheaps::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataHeaps {
    /// The `#Strings` heap
    pub strings: StringHeap,
    /// The `#US` heap
    pub userstrings: UserStringHeap,
    /// The `#GUID` heap
    pub guids: GuidHeap,
    /// The `#Blob` heap
    pub blobs: BlobHeap,
}

impl MetadataHeaps {
    /// Creates a set of empty heaps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All heaps in stream order.
    #[must_use]
    pub fn heaps(&self) -> [&dyn Heap; 4] {
        [&self.strings, &self.userstrings, &self.guids, &self.blobs]
    }

    /// All heaps in stream order, mutably, e.g. to assign positions.
    pub fn heaps_mut(&mut self) -> [&mut dyn Heap; 4] {
        [
            &mut self.strings,
            &mut self.userstrings,
            &mut self.guids,
            &mut self.blobs,
        ]
    }

    /// Heaps holding at least one entry, in stream order.
    pub fn non_empty(&self) -> impl Iterator<Item = &dyn Heap> {
        self.heaps().into_iter().filter(|heap| !heap.is_empty())
    }

    /// The `HeapSizes` flags for the `#~` header.
    #[must_use]
    pub fn heap_sizes(&self) -> HeapSizes {
        let mut sizes = HeapSizes::empty();
        sizes.set(HeapSizes::LARGE_STRINGS, self.strings.is_large());
        sizes.set(HeapSizes::LARGE_GUID, self.guids.is_large());
        sizes.set(HeapSizes::LARGE_BLOB, self.blobs.is_large());
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_order() {
        let heaps = MetadataHeaps::new();
        let names: Vec<_> = heaps.heaps().iter().map(|heap| heap.name()).collect();
        assert_eq!(names, ["#Strings", "#US", "#GUID", "#Blob"]);
        assert_eq!(heaps.non_empty().count(), 0);
    }

    #[test]
    fn large_heaps() {
        let mut heaps = MetadataHeaps::new();
        heaps.blobs.add(&vec![0x55; 0x10000]).unwrap();
        heaps.strings.add_str("small").unwrap();

        assert_eq!(heaps.heap_sizes(), HeapSizes::LARGE_BLOB);
        assert_eq!(heaps.blobs.index_size(), 4);
        assert_eq!(heaps.strings.index_size(), 2);
        assert_eq!(heaps.heap_sizes().bits(), 0x04);
    }

    #[test]
    fn positions() {
        let mut heaps = MetadataHeaps::new();

        let mut offset = 0x200;
        for heap in heaps.heaps_mut() {
            heap.set_position(offset, offset + 0x1800);
            offset += heap.aligned_length();
        }

        assert_eq!(heaps.strings.position().unwrap().file_offset, 0x200);
        assert_eq!(heaps.userstrings.position().unwrap().file_offset, 0x204);
        assert_eq!(heaps.guids.position().unwrap().file_offset, 0x208);
        assert_eq!(heaps.blobs.position().unwrap().file_offset, 0x208);
        assert_eq!(heaps.blobs.position().unwrap().rva, 0x1A08);
    }
}
