use alloc::vec::Vec;

use crate::view::ByteView;

/// Growable append-only byte buffer backing [`JsonWriter`](crate::JsonWriter).
///
/// Growth is amortized doubling with a caller-supplied minimum: `reserve(n)`
/// makes room for at least `n` more bytes and at least doubles the capacity
/// when it has to reallocate, so appending `N` bytes costs `O(N)` overall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
}

impl ByteBuffer {
    /// Creates an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Ensures at least `additional` more bytes can be appended without
    /// reallocating.
    pub fn reserve(&mut self, additional: usize) {
        let free = self.data.capacity() - self.data.len();
        if free >= additional {
            return;
        }
        let wanted = (self.data.len() + additional).max(self.data.capacity() * 2);
        self.data.reserve_exact(wanted - self.data.len());
    }

    /// Appends `bytes` to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.data.extend_from_slice(bytes);
    }

    /// Appends a single byte.
    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        self.data.push(byte);
    }

    /// Grows the buffer by `n` zeroed bytes and returns them for the caller
    /// to fill in place.
    pub fn extend(&mut self, n: usize) -> &mut [u8] {
        self.reserve(n);
        let start = self.data.len();
        self.data.resize(start + n, 0);
        &mut self.data[start..]
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Currently allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Borrows the written bytes as a view.
    #[must_use]
    pub fn as_view(&self) -> ByteView<'_> {
        ByteView::new(&self.data)
    }

    /// Borrows the written bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
