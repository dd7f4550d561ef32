//! # Secure Key Storage
//!
//! `SecureBytes` owns key material for the lifetime of a cipher. On unix the
//! backing allocation is locked into RAM with `mlock` so it never reaches
//! swap; on every platform the bytes are zeroed before the memory is
//! released.
//!
//! [`Pinned`] applies the same locking to an arbitrary boxed value, such as
//! an expanded key schedule that wipes itself on drop.

use std::fmt;
use std::mem;
use std::ops::Deref;
use zeroize::Zeroize;

/// Heap buffer for secret bytes: pinned where the OS allows, zeroed on drop.
pub struct SecureBytes {
    bytes: Box<[u8]>,
    locked: bool,
}

impl SecureBytes {
    /// Copy `bytes` into a fresh locked allocation.
    pub fn new(bytes: &[u8]) -> Self {
        let bytes: Box<[u8]> = bytes.into();
        let locked = lock(&bytes);
        if !locked && !bytes.is_empty() {
            log::debug!("mlock unavailable, key material may be swapped");
        }
        SecureBytes { bytes, locked }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the allocation is currently locked in memory.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(mut bytes: Vec<u8>) -> Self {
        let secure = SecureBytes::new(&bytes);
        bytes.zeroize();
        secure
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Clone for SecureBytes {
    fn clone(&self) -> Self {
        SecureBytes::new(&self.bytes)
    }
}

impl PartialEq for SecureBytes {
    fn eq(&self, other: &Self) -> bool {
        crate::util::constant_time_compare(&self.bytes, &other.bytes)
    }
}

impl Eq for SecureBytes {}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.bytes.len())
            .field("locked", &self.locked)
            .finish()
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.bytes.zeroize();
        if self.locked {
            unlock(&self.bytes);
        }
    }
}

/// Boxed value kept in locked memory. Wiping is left to `T`'s own `Drop`.
pub struct Pinned<T> {
    value: Box<T>,
    locked: bool,
}

impl<T> Pinned<T> {
    pub fn new(value: T) -> Self {
        let value = Box::new(value);
        let locked = lock_region((&*value as *const T).cast(), mem::size_of::<T>());
        if !locked {
            log::debug!("mlock unavailable, key schedule may be swapped");
        }
        Pinned { value, locked }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl<T> Deref for Pinned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Drop for Pinned<T> {
    fn drop(&mut self) {
        if self.locked {
            unlock_region((&*self.value as *const T).cast(), mem::size_of::<T>());
        }
    }
}

fn lock(bytes: &[u8]) -> bool {
    lock_region(bytes.as_ptr(), bytes.len())
}

fn unlock(bytes: &[u8]) {
    unlock_region(bytes.as_ptr(), bytes.len())
}

#[cfg(unix)]
fn lock_region(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    // SAFETY: the pointer and length describe a live allocation owned by the
    // caller; mlock does not read or write the memory.
    unsafe { libc::mlock(ptr.cast(), len) == 0 }
}

#[cfg(unix)]
fn unlock_region(ptr: *const u8, len: usize) {
    // SAFETY: same region that was passed to mlock in `lock_region`.
    unsafe {
        libc::munlock(ptr.cast(), len);
    }
}

#[cfg(not(unix))]
fn lock_region(_ptr: *const u8, _len: usize) -> bool {
    false
}

#[cfg(not(unix))]
fn unlock_region(_ptr: *const u8, _len: usize) {}
