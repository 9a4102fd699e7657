//! Shared encoding helpers.

mod compressed;

pub use compressed::{
    compressed_uint_size, read_compressed_uint, write_compressed_uint, MAX_COMPRESSED_UINT,
};
