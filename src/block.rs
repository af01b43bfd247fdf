// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use bytemuck::allocation::{pod_collect_to_vec, try_cast_vec};
use bytemuck::Pod;
use core::fmt;
use core::mem::{replace, size_of, take};
use core::ops::Deref;
use core::ptr;
use tracing::warn;

enum Storage<'a, T> {
    Empty,
    Owned(Vec<T>),
    Borrowed(&'a [T]),
}

/// A contiguous memory block that either owns its storage or borrows it.
///
/// Ownership only changes hands through [`Block::transfer`] or [`Block::cast`],
/// which leave the source block empty. Memory is released when an owning
/// block is dropped; dropping a borrowed or empty block is a no-op.
///
/// The element type can be reinterpreted as any other plain-old-data type:
/// the byte size is preserved and the element count is recomputed from it.
pub struct Block<'a, T: Pod> {
    storage: Storage<'a, T>,
}

/// Number of bytes, not larger than `bytes`, that hold a whole number of `U`
fn whole_bytes<U>(bytes: usize) -> usize {
    let size = size_of::<U>();
    debug_assert_ne!(size, 0);
    bytes - (bytes % size)
}

impl<'a, T: Pod> Block<'a, T> {
    /// Returns an empty, unowned block
    pub const fn empty() -> Self {
        Self {
            storage: Storage::Empty,
        }
    }

    /// Allocates zeroed storage for `count` elements.
    ///
    /// If the allocation fails the returned block is empty: it holds no
    /// memory and its count is zero.
    pub fn acquire(count: usize) -> Self {
        let mut data: Vec<T> = Vec::new();
        if data.try_reserve_exact(count).is_err() {
            warn!(
                count,
                element_size = size_of::<T>(),
                "unable to allocate memory block"
            );
            return Self::empty();
        }

        data.resize(count, T::zeroed());
        Self {
            storage: Storage::Owned(data),
        }
    }

    /// Borrows existing storage. The caller keeps responsibility for it.
    pub const fn wrap(data: &'a [T]) -> Self {
        Self {
            storage: Storage::Borrowed(data),
        }
    }

    /// Moves the storage of `other` into this block, reinterpreted as `T`.
    ///
    /// Whatever this block held before is released. `other` is left empty
    /// and unowned.
    pub fn transfer<U: Pod>(&mut self, other: &mut Block<'a, U>) {
        *self = take(other).cast();
    }

    /// Consumes the block, moving its storage into a block of another element type.
    ///
    /// Trailing bytes that do not fill a whole `U` are dropped from the view.
    /// When the storage alignment does not fit `U`, the bytes are copied into
    /// a new owned allocation.
    pub fn cast<U: Pod>(self) -> Block<'a, U> {
        let storage = match self.storage {
            Storage::Empty => Storage::Empty,
            Storage::Owned(data) => match try_cast_vec::<T, U>(data) {
                Ok(data) => Storage::Owned(data),
                Err((_, data)) => {
                    let bytes: &[u8] = bytemuck::cast_slice(&data);
                    let whole = whole_bytes::<U>(bytes.len());
                    Storage::Owned(pod_collect_to_vec(&bytes[..whole]))
                }
            },
            Storage::Borrowed(data) => {
                let bytes: &[u8] = bytemuck::cast_slice(data);
                let whole = whole_bytes::<U>(bytes.len());
                match bytemuck::try_cast_slice(&bytes[..whole]) {
                    Ok(data) => Storage::Borrowed(data),
                    Err(_) => Storage::Owned(pod_collect_to_vec(&bytes[..whole])),
                }
            }
        };

        Block { storage }
    }

    /// Views the same bytes as elements of type `U`.
    ///
    /// # Panics
    ///
    /// Panics if the storage is not suitably aligned for `U`.
    pub fn reinterpret<U: Pod>(&self) -> &[U] {
        let bytes = self.as_bytes();
        bytemuck::cast_slice(&bytes[..whole_bytes::<U>(bytes.len())])
    }

    /// Same as [`Block::reinterpret`], returning `None` when the storage is
    /// not suitably aligned for `U`.
    pub fn try_reinterpret<U: Pod>(&self) -> Option<&[U]> {
        let bytes = self.as_bytes();
        bytemuck::try_cast_slice(&bytes[..whole_bytes::<U>(bytes.len())]).ok()
    }

    /// Hands the owned storage back to the caller, leaving the block empty.
    ///
    /// Returns `None` for borrowed and empty blocks.
    pub fn release(&mut self) -> Option<Vec<T>> {
        match replace(&mut self.storage, Storage::Empty) {
            Storage::Owned(data) => Some(data),
            Storage::Borrowed(_) | Storage::Empty => None,
        }
    }

    /// Returns true if dropping the block releases memory
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// The elements of the block, empty for an empty block
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Empty => &[],
            Storage::Owned(data) => data.as_slice(),
            Storage::Borrowed(data) => data,
        }
    }

    /// Mutable access to the elements. Borrowed blocks are read-only.
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        match &mut self.storage {
            Storage::Empty => Some(&mut []),
            Storage::Owned(data) => Some(data.as_mut_slice()),
            Storage::Borrowed(_) => None,
        }
    }

    /// The raw bytes of the block
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Address of the first element, null for an empty block
    pub fn as_ptr(&self) -> *const T {
        match &self.storage {
            Storage::Empty => ptr::null(),
            Storage::Owned(data) => data.as_ptr(),
            Storage::Borrowed(data) => data.as_ptr(),
        }
    }

    /// Size of the block in bytes
    pub fn byte_len(&self) -> usize {
        self.len() * size_of::<T>()
    }
}

impl<T: Pod> Default for Block<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Pod> Deref for Block<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod> From<Vec<T>> for Block<'_, T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            storage: Storage::Owned(data),
        }
    }
}

impl<T: Pod> fmt::Debug for Block<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ownership = match self.storage {
            Storage::Empty => "empty",
            Storage::Owned(_) => "owned",
            Storage::Borrowed(_) => "borrowed",
        };

        f.debug_struct("Block")
            .field("ownership", &ownership)
            .field("count", &self.len())
            .finish()
    }
}
