use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! invalid_entry_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidEntry {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidEntry {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Heap Construction Errors
/// - [`Error::InvalidEntry`] - A value can not be represented inside the target heap
/// - [`Error::HeapOverflow`] - The heap or an entry would exceed the 32-bit format limits
///
/// ## Decoding Errors
/// - [`Error::Malformed`] - Invalid encoded data, e.g. a broken compressed integer
/// - [`Error::OutOfBounds`] - Attempted to read beyond the provided data
///
/// ## I/O Errors
/// - [`Error::FileError`] - The output sink failed while a heap was written
///
/// # Examples
///
/// ```rust
/// use cilheaps::{Error, StringHeap};
///
/// let mut strings = StringHeap::new();
/// match strings.add(b"Broken\0Name") {
///     Ok(offset) => println!("Stored at {}", offset),
///     Err(Error::InvalidEntry { message, .. }) => eprintln!("Rejected: {}", message),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The value can not be stored in the heap it was added to.
    ///
    /// Raised by the `#Strings` heap when an entry contains a NUL byte, which is
    /// the entry terminator of that heap. The error includes the source location
    /// where the violation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the rejected value
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid entry - {file}:{line}: {message}")]
    InvalidEntry {
        /// The message to be printed for the InvalidEntry error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Adding the entry would push the heap past the limits of the format.
    ///
    /// Heap offsets are 32-bit and length prefixes are compressed integers with
    /// a maximum of `0x1FFF_FFFF`. Values beyond either limit are rejected before
    /// any state changes.
    #[error("Heap {heap} would overflow - requested length {length}")]
    HeapOverflow {
        /// Stream name of the heap that rejected the entry
        heap: &'static str,
        /// The length that could not be represented
        length: u64,
    },

    /// Encoded data is damaged and could not be decoded.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// I/O error of the sink a heap was written to.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
