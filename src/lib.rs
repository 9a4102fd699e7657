// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cilheaps
//!
//! Builders for the four heap streams of ECMA-335 metadata: `#Strings`, `#US`, `#Blob` and
//! `#GUID`. A metadata writer adds values while it builds its tables and signatures, stores
//! the returned offsets, and finally serializes every heap into its stream.
//!
//! ## Features
//!
//! - **Deduplication** - Equal values are stored once and always map to the same offset
//! - **Stable offsets** - Offsets are assigned append-only and never change during a build
//! - **Exact layout** - Serialized heaps match ECMA-335 II.24.2 byte for byte
//! - **Layout helpers** - Index widths, `HeapSizes` flags and 4-byte aligned lengths
//!
//! ## Quick Start
//!
//! ```rust
//! use cilheaps::prelude::*;
//!
//! let mut heaps = MetadataHeaps::new();
//!
//! let name = heaps.strings.add_str("Program")?;
//! let literal = heaps.userstrings.add_str("Hello, World!")?;
//! let signature = heaps.blobs.add(&[0x00, 0x00, 0x01])?;
//! let mvid = heaps
//!     .guids
//!     .add(Some(&uguid::guid!("d437908e-65e6-487c-9735-7bdff699bea5")))?;
//!
//! assert_eq!((name, literal, signature, mvid), (1, 1, 1, 1));
//!
//! let mut stream: Vec<u8> = Vec::new();
//! for heap in heaps.non_empty() {
//!     heap.write_aligned_to(&mut stream)?;
//! }
//! # Ok::<(), cilheaps::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`heaps`] - The [`Heap`] contract and the four heap builders
//! - [`utils`] - Compressed unsigned integer encoding shared by `#US` and `#Blob`
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Diagnostics are emitted through the [`log`](https://docs.rs/log) facade. The library never
//! installs a logger.
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use cilheaps::prelude::*;
///
/// let mut strings = StringHeap::new();
/// strings.add_str("Main")?;
/// assert_eq!(strings.length(), 6);
/// # Ok::<(), cilheaps::Error>(())
/// ```
pub mod prelude;

/// Metadata heap builders and their common contract.
pub mod heaps;

/// Encoding helpers shared by the heaps.
pub mod utils;

/// `cilheaps` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilheaps` Error type
///
/// # Examples
///
/// ```rust
/// use cilheaps::{Error, StringHeap};
///
/// let mut strings = StringHeap::new();
/// assert!(matches!(strings.add(b"a\0b"), Err(Error::InvalidEntry { .. })));
/// ```
pub use error::Error;

pub use heaps::{
    BlobHeap, GuidHeap, Heap, HeapBase, HeapPosition, HeapSizes, MetadataHeaps, StringHeap,
    UserStringHeap,
};
