#![no_main]

use cilheaps::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut heaps = MetadataHeaps::new();

    for chunk in data.split(|&b| b == 0xFF) {
        let _ = heaps.strings.add(chunk);
        heaps.blobs.add(chunk).unwrap();

        let units: Vec<u16> = chunk
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        heaps
            .userstrings
            .add(widestring::U16Str::from_slice(&units))
            .unwrap();

        if let Ok(bytes) = <[u8; 16]>::try_from(chunk) {
            heaps.guids.add(Some(&uguid::Guid::from_bytes(bytes))).unwrap();
        }
    }

    for heap in heaps.heaps() {
        let bytes = heap.to_bytes().unwrap();
        assert_eq!(bytes.len(), heap.length() as usize);
    }
});
