use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the adapter layer.
///
/// [`Error::DestinationTooSmall`] is recoverable: the caller may retry the
/// same operation with a larger destination. Everything else aborts the
/// current call; after a failure an adapter instance is only guaranteed to be
/// usable for `close`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The destination buffer cannot hold the output of the call.
    #[error("destination buffer too small: {available} bytes available{}", needed_suffix(.needed))]
    DestinationTooSmall {
        /// Exact number of bytes required, when the engine can tell.
        needed: Option<usize>,
        /// Remaining capacity the caller supplied.
        available: usize,
    },

    /// An I/O call was made on an adapter that has already been closed.
    #[error("stream is closed")]
    StreamClosed,

    /// The input is not a valid frame for the configured codec.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A failure of the wrapped source or sink, propagated unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn needed_suffix(needed: &Option<usize>) -> String {
    match needed {
        Some(n) => format!(", {n} required"),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn too_small(needed: impl Into<Option<usize>>, available: usize) -> Self {
        Error::DestinationTooSmall {
            needed: needed.into(),
            available,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedFrame(msg.into())
    }

    /// True when retrying the failed call with a larger destination may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DestinationTooSmall { .. })
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Io(io) => io,
            Error::MalformedFrame(_) => io::Error::new(io::ErrorKind::InvalidData, e),
            Error::StreamClosed | Error::DestinationTooSmall { .. } => io::Error::other(e),
        }
    }
}
