//! A library for inspecting and patching the headers of [Windows
//! cabinet](https://en.wikipedia.org/wiki/Cabinet_(file_format)) (CAB) files
//! that hold exactly one folder, one file and one data block.
//!
//! A [`Cabinet`] is parsed from a buffer holding the whole file.  Its records
//! can then be dumped, mutated field by field, and serialized back to bytes.
//! An unmodified cabinet serializes to exactly the bytes it was parsed from.
//! Checksums are never verified or recomputed and payloads are never
//! decompressed, which makes this suitable for producing malformed inputs.
//!
//! ```no_run
//! let data = std::fs::read("input.cab")?;
//! let mut cabinet = cabpatch::Cabinet::parse(&data)?;
//! cabinet.set_set_id(0x1234);
//! cabinet.zero_checksum();
//! std::fs::write("output.cab", cabinet.to_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[macro_use]
mod macros;

mod block;
mod cabinet;
mod consts;
mod ctype;
mod datetime;
mod error;
mod file;
mod folder;
mod header;
mod string;

pub use crate::block::DataBlock;
pub use crate::cabinet::{patch_bytes, Cabinet};
pub use crate::ctype::CompressionType;
pub use crate::datetime::DosTimestamp;
pub use crate::error::{Error, Result};
pub use crate::file::FileEntry;
pub use crate::folder::Folder;
pub use crate::header::Header;
pub use crate::string::find_terminator;

/// Returns the `len` bytes at `offset`, or a format error naming `what` if
/// `data` is too short to hold them.
pub(crate) fn record<'data>(
    data: &'data [u8],
    offset: usize,
    len: usize,
    what: &str,
) -> Result<&'data [u8]> {
    match offset.checked_add(len).and_then(|end| data.get(offset..end)) {
        Some(bytes) => Ok(bytes),
        None => format_error!(
            "{} record at offset 0x{:x} is truncated ({} bytes needed, {} available)",
            what,
            offset,
            len,
            data.len().saturating_sub(offset)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::record;
    use crate::error::Error;

    #[test]
    fn record_within_bounds() {
        assert_eq!(record(b"abcdef", 2, 3, "test").unwrap(), b"cde");
        assert_eq!(record(b"abcdef", 6, 0, "test").unwrap(), b"");
    }

    #[test]
    fn record_out_of_bounds() {
        match record(b"abcdef", 4, 3, "CFTEST") {
            Err(Error::Format(message)) => assert_eq!(
                message,
                "CFTEST record at offset 0x4 is truncated \
                 (3 bytes needed, 2 available)"
            ),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(record(b"abcdef", usize::MAX, 2, "test").is_err());
    }
}
