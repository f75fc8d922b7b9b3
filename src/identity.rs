//! Identity keys: hashing and equality by address instead of by value.

use crate::error::{Result, TableError};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

/// Pointer-like values that can report the address they point at.
///
/// Only the data address counts: two wide pointers to the same place with
/// different metadata are the same identity. Zero-sized values may share
/// an address and are then indistinguishable.
pub trait Address {
    fn address(&self) -> usize;
}

impl<T: ?Sized> Address for &T {
    #[inline]
    fn address(&self) -> usize {
        (*self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for &mut T {
    #[inline]
    fn address(&self) -> usize {
        (&**self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for Box<T> {
    #[inline]
    fn address(&self) -> usize {
        (&**self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for Rc<T> {
    #[inline]
    fn address(&self) -> usize {
        Rc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for Arc<T> {
    #[inline]
    fn address(&self) -> usize {
        Arc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for NonNull<T> {
    #[inline]
    fn address(&self) -> usize {
        self.as_ptr().cast::<()>() as usize
    }
}

impl<P: Address> Address for IdentityKey<P> {
    #[inline]
    fn address(&self) -> usize {
        self.0.address()
    }
}

/// Folds an address into the 32-bit hash used for bucket placement.
///
/// Placement masks the low bits and aligned addresses have none set, so
/// the address goes through the 64-bit murmur3 finalizer first.
#[inline]
pub fn identity_hash(address: usize) -> u32 {
    let mut x = address as u64;
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x as u32
}

/// A pointer-like key that hashes and compares by the address it points at.
#[derive(Clone, Copy)]
pub struct IdentityKey<P>(P);

impl<P: Address> IdentityKey<P> {
    pub fn new(pointer: P) -> Self {
        IdentityKey(pointer)
    }

    pub fn get(&self) -> &P {
        &self.0
    }

    pub fn into_inner(self) -> P {
        self.0
    }

    #[inline]
    pub fn hash32(&self) -> u32 {
        identity_hash(self.address())
    }
}

impl<T: ?Sized> IdentityKey<NonNull<T>> {
    /// Wraps a raw pointer, rejecting null before any hashing happens.
    pub fn from_raw(ptr: *const T) -> Result<Self> {
        NonNull::new(ptr.cast_mut())
            .map(IdentityKey)
            .ok_or(TableError::NullKey)
    }
}

impl<P: Address> PartialEq for IdentityKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<P: Address> Eq for IdentityKey<P> {}

impl<P: Address> Hash for IdentityKey<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.address());
    }
}

impl<P: Address> fmt::Debug for IdentityKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({:#x})", self.address())
    }
}
