//! Byte buffer for passing data across the native boundary.

use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

/// Owned byte array with a C layout. Freed on drop unless ownership is
/// released with [`CByteArray::into_raw`].
#[repr(C)]
pub struct CByteArray {
    data: *mut u8,
    len: usize,
}

// SAFETY: the array exclusively owns its allocation.
unsafe impl Send for CByteArray {}
unsafe impl Sync for CByteArray {}

impl CByteArray {
    pub fn from_boxed(bytes: Box<[u8]>) -> Self {
        let len = bytes.len();
        let data = Box::into_raw(bytes) as *mut u8;
        Self { data, len }
    }

    pub fn from_vec(v: Vec<u8>) -> Self {
        Self::from_boxed(v.into_boxed_slice())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `data` came from a boxed slice of exactly `len` bytes.
        unsafe { slice::from_raw_parts(self.data, self.len) }
    }

    /// Releases ownership; the caller must return it via `from_raw`.
    pub fn into_raw(self) -> (*mut u8, usize) {
        let me = ManuallyDrop::new(self);
        (me.data, me.len)
    }

    /// # Safety
    /// `data` and `len` must come from a previous [`CByteArray::into_raw`].
    pub unsafe fn from_raw(data: *mut u8, len: usize) -> Self {
        Self { data, len }
    }

    pub fn into_boxed(self) -> Box<[u8]> {
        let (data, len) = self.into_raw();
        // SAFETY: reconstructs the box released by `into_raw`.
        unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)) }
    }
}

impl Drop for CByteArray {
    fn drop(&mut self) {
        // SAFETY: `data`/`len` still describe the original boxed slice.
        unsafe { drop(Box::from_raw(ptr::slice_from_raw_parts_mut(self.data, self.len))) }
    }
}

/// Frees an array handed to native code.
#[unsafe(no_mangle)]
pub extern "C" fn pyb_byte_array_free(array: CByteArray) {
    drop(array);
}
