//! GUID Heap (`#GUID`) builder
//!
//! Builds the ECMA-335 `#GUID` heap, a plain sequence of 128-bit GUIDs. Entries are addressed
//! by 1-based index; index 0 means "no GUID". The heap has no placeholder and no length
//! prefixes.
//!
//! # Reference
//! - [ECMA-335 II.24.2.5](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::io::Write;

use uguid::Guid;

use crate::{
    heaps::{advance_offset, Heap, HeapBase},
    Result,
};

/// Builder for the `#GUID` heap.
///
/// An assembly usually carries a single module MVID and maybe an EnC id, so lookups are a
/// linear scan over the stored GUIDs.
///
/// # Examples
///
/// ```rust
/// use cilheaps::{GuidHeap, Heap};
///
/// let mut guids = GuidHeap::new();
/// let mvid = uguid::guid!("d437908e-65e6-487c-9735-7bdff699bea5");
///
/// assert_eq!(guids.add(Some(&mvid))?, 1);
/// assert_eq!(guids.add(None)?, 0);
/// assert_eq!(guids.length(), 16);
/// # Ok::<(), cilheaps::Error>(())
/// ```
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.5
///
#[derive(Debug, Clone)]
pub struct GuidHeap {
    base: HeapBase,
    guids: Vec<Guid>,
}

impl GuidHeap {
    /// Creates an empty `#GUID` heap.
    #[must_use]
    pub fn new() -> Self {
        GuidHeap {
            base: HeapBase::new(0),
            guids: Vec::new(),
        }
    }

    /// Adds a GUID and returns its 1-based index.
    ///
    /// `None` maps to index 0. A GUID that is already present returns its existing index.
    ///
    /// # Errors
    /// Returns [`crate::Error::HeapOverflow`] if the heap would exceed its 32-bit limit.
    pub fn add(&mut self, guid: Option<&Guid>) -> Result<u32> {
        let Some(guid) = guid else {
            return Ok(0);
        };

        if let Some(index) = self.find(guid) {
            return Ok(index);
        }

        let index = advance_offset(self.name(), self.length(), 16)? / 16;
        self.guids.push(*guid);

        log::trace!("#GUID entry {} - {}", index, guid);
        Ok(index)
    }

    /// Returns the GUID at the 1-based `index`.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Guid> {
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        self.guids.get(position)
    }

    /// Returns the 1-based index of `guid`, if it was added before.
    #[must_use]
    pub fn find(&self, guid: &Guid) -> Option<u32> {
        self.guids
            .iter()
            .position(|stored| stored == guid)
            .and_then(|position| u32::try_from(position + 1).ok())
    }

    /// Number of stored GUIDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guids.len()
    }

    /// Iterates over `(index, guid)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Guid)> {
        (1u32..).zip(self.guids.iter())
    }
}

impl Default for GuidHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap for GuidHeap {
    fn name(&self) -> &'static str {
        "#GUID"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn length(&self) -> u32 {
        // Bounded by advance_offset on every insertion
        (self.guids.len() * 16) as u32
    }

    fn write_to(&self, sink: &mut dyn Write) -> Result<()> {
        log::debug!("Writing #GUID heap, {} bytes", self.length());

        for guid in &self.guids {
            sink.write_all(&guid.to_bytes())?;
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

#[cfg(test)]
mod tests {
    use uguid::guid;

    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let expected : [u8; 48] = [
            /* 1 - 0;16   */  0x8e, 0x90, 0x37, 0xd4, 0xe6, 0x65, 0x7c, 0x48, 0x97, 0x35, 0x7b, 0xdf, 0xf6, 0x99, 0xbe, 0xa5,
            /* 2 - 16;32  */  0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
            /* 3 - 32;48  */  0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let mut guids = GuidHeap::new();
        assert_eq!(guids.add(Some(&guid!("d437908e-65e6-487c-9735-7bdff699bea5"))).unwrap(), 1);
        assert_eq!(guids.add(Some(&guid!("AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"))).unwrap(), 2);
        assert_eq!(guids.add(Some(&Guid::ZERO)).unwrap(), 3);

        assert_eq!(guids.length(), 48);
        assert_eq!(guids.to_bytes().unwrap(), expected);
    }

    #[test]
    fn deduplication() {
        let mut guids = GuidHeap::new();
        let mvid = guid!("12345678-9abc-def0-1122-334455667788");

        assert_eq!(guids.add(Some(&mvid)).unwrap(), 1);
        assert_eq!(guids.add(Some(&mvid)).unwrap(), 1);
        assert_eq!(guids.add(Some(&mvid)).unwrap(), 1);
        assert_eq!(guids.add(None).unwrap(), 0);
        assert_eq!(guids.length(), 16);
        assert_eq!(guids.len(), 1);
    }

    #[test]
    fn empty() {
        let mut guids = GuidHeap::new();
        assert!(guids.is_empty());
        assert!(guids.to_bytes().unwrap().is_empty());

        guids.add(Some(&Guid::ZERO)).unwrap();
        assert!(!guids.is_empty());
    }

    #[test]
    fn lookups() {
        let mut guids = GuidHeap::new();
        let first = guid!("d437908e-65e6-487c-9735-7bdff699bea5");
        let second = guid!("AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA");
        guids.add(Some(&first)).unwrap();
        guids.add(Some(&second)).unwrap();

        assert_eq!(guids.get(0), None);
        assert_eq!(guids.get(1), Some(&first));
        assert_eq!(guids.get(2), Some(&second));
        assert_eq!(guids.get(3), None);
        assert_eq!(guids.find(&second), Some(2));

        let indices: Vec<_> = guids.iter().map(|(index, _)| index).collect();
        assert_eq!(indices, [1, 2]);
    }
}
