//! Close-once discipline shared by the stream and buffer adapters.

use crate::error::{Error, Result};

/// Guards an adapter's streaming context.
///
/// The first `close` releases the context, every later `close` is a no-op,
/// and any access after close fails with [`Error::StreamClosed`].
#[derive(Debug)]
pub(crate) struct Guarded<T> {
    inner: Option<T>,
}

impl<T> Guarded<T> {
    pub(crate) fn new(inner: T) -> Self {
        Self { inner: Some(inner) }
    }

    pub(crate) fn get(&mut self) -> Result<&mut T> {
        self.inner.as_mut().ok_or(Error::StreamClosed)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Releases the context: returns it on the first call, `None` afterwards.
    pub(crate) fn close(&mut self) -> Option<T> {
        self.inner.take()
    }
}
