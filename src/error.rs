use std::{error, fmt, io};

/// An error that occurred while parsing or patching a cabinet.
#[derive(Debug)]
pub enum Error {
    /// The input is not a cabinet this crate can parse: bad signature,
    /// truncated record, unterminated or non-UTF-8 file name.
    Format(String),
    /// A patch value is shorter than the number of bytes to patch.
    Length {
        /// The number of bytes the patch was asked to overwrite.
        size: usize,
        /// The length of the supplied value.
        actual: usize,
    },
    /// A patch range extends past the end of the serialized cabinet.
    OutOfBounds {
        /// Start of the patch range.
        offset: usize,
        /// Length of the patch range.
        size: usize,
        /// Length of the serialized cabinet.
        len: usize,
    },
    /// An I/O error occurred while writing a cabinet.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(message) => {
                write!(f, "Invalid cabinet: {}", message)
            }
            Error::Length { size, actual } => write!(
                f,
                "Patch value is {} bytes, but {} bytes were requested",
                actual, size
            ),
            Error::OutOfBounds { offset, size, len } => write!(
                f,
                "Cannot patch {} bytes at offset 0x{:x}, cabinet length is {}",
                size, offset, len
            ),
            Error::Io(error) => write!(f, "{}", error),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

/// The `Result` type for this library.
pub type Result<T> = std::result::Result<T, Error>;
