//! # cilheaps Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilheaps library. Import this module to get quick access to the heap builders
//! and the [`Heap`] trait whose methods they share.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilheaps operations
pub use crate::Error;

/// The result type used throughout cilheaps
pub use crate::Result;

// ================================================================================================
// Heaps
// ================================================================================================

/// The common heap contract and its shared state
pub use crate::heaps::{Heap, HeapBase, HeapPosition};

/// The four metadata heap builders
pub use crate::heaps::{BlobHeap, GuidHeap, StringHeap, UserStringHeap};

/// The set of all heaps of a metadata build
pub use crate::heaps::{HeapSizes, MetadataHeaps};

// ================================================================================================
// Encoding
// ================================================================================================

/// ECMA-335 compressed unsigned integers
pub use crate::utils::{compressed_uint_size, read_compressed_uint, write_compressed_uint};
