// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Failed to allocate a surface or a context.
    ///
    /// Also occurs when the requested surface size is zero.
    NoMemory,

    /// Failed to read the source or to write the output.
    IoError(std::io::Error),

    /// The provided file doesn't exist.
    FileNotFound,

    /// A provided value was invalid.
    InvalidValue,

    /// The call was not valid in the current state.
    ///
    /// Like rendering before parsing or sending a chunk without starting a stream.
    InvalidCall,

    /// Failed to parse an SVG data.
    ParseError(usvg::Error),
}

impl From<usvg::Error> for Error {
    fn from(e: usvg::Error) -> Self {
        Error::ParseError(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound
        } else {
            Error::IoError(e)
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(e: png::EncodingError) -> Self {
        // Output failures are always I/O errors, even when the directory is missing.
        match e {
            png::EncodingError::IoError(e) => Error::IoError(e),
            e => Error::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NoMemory => {
                write!(f, "failed to allocate a surface")
            }
            Error::IoError(ref e) => {
                write!(f, "an I/O error occurred cause {}", e)
            }
            Error::FileNotFound => {
                write!(f, "the provided file was not found")
            }
            Error::InvalidValue => {
                write!(f, "a provided value is invalid")
            }
            Error::InvalidCall => {
                write!(f, "the call is not valid in the current state")
            }
            Error::ParseError(ref e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::IoError(ref e) => Some(e),
            Error::ParseError(ref e) => Some(e),
            _ => None,
        }
    }
}
