//! Vector aggregates and lane storage.
//!
//! A [`Vector`] is the transient, fixed-length value that whole-vector reads produce and writes
//! consume. Register-resident vectors live in byte storage ([`V64`] through [`V512`]) that can be
//! viewed at any supported lane type; lanes are little-endian, lane 0 in the lowest bytes.

mod access;
mod broadcast;
mod storage;

pub use access::{AggregateWritable, VectorReadable, VectorWritable};
pub use broadcast::*;
pub use storage::{LaneView, VectorStorage, V128, V256, V512, V64};

use crate::error::VectorError;
use crate::intrinsics::MemoryScalar;
use crate::scalar::{BitPattern, Integer};

/// Element types a vector lane can hold: 8 to 128-bit unsigned integers and the two float widths.
///
/// Signed views of integer lanes are produced on extraction; storage is always the unsigned bit
/// pattern.
pub trait Lane: BitPattern + MemoryScalar<Value = Self> {}

impl Lane for u8 {}
impl Lane for u16 {}
impl Lane for u32 {}
impl Lane for u64 {}
impl Lane for u128 {}
impl Lane for f32 {}
impl Lane for f64 {}

/// A fixed-length ordered sequence of lanes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T, const N: usize> {
    pub elems: [T; N],
}

/// Vectors of any length, for code that only knows a storage type's lane view.
pub trait Aggregate: Copy + core::fmt::Debug + PartialEq {
    type Elem: Lane;
    const LEN: usize;

    fn from_fn(f: impl FnMut(usize) -> Self::Elem) -> Self;
    fn as_slice(&self) -> &[Self::Elem];
}

impl<T: Lane, const N: usize> Aggregate for Vector<T, N> {
    type Elem = T;
    const LEN: usize = N;

    #[inline]
    fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self {
            elems: core::array::from_fn(f),
        }
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.elems
    }
}

impl<T: Lane, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Lane, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(elems: [T; N]) -> Self {
        Self { elems }
    }
}

impl<T: Lane, const N: usize> Vector<T, N> {
    pub const LEN: usize = N;

    #[inline]
    pub const fn new(elems: [T; N]) -> Self {
        Self { elems }
    }

    #[inline]
    pub fn zeroed() -> Self {
        Self {
            elems: [T::default(); N],
        }
    }

    /// The all-zero aggregate of the same shape.
    #[inline]
    pub fn cleared(&self) -> Self {
        Self::zeroed()
    }

    #[inline]
    fn check(index: usize) -> Result<(), VectorError> {
        if index < N {
            Ok(())
        } else {
            Err(VectorError::LaneOutOfRange { index, len: N })
        }
    }

    pub fn extract(&self, index: usize) -> Result<T, VectorError> {
        Self::check(index)?;
        Ok(self.elems[index])
    }

    /// A copy with lane `index` replaced by `value`.
    pub fn insert(mut self, index: usize, value: T) -> Result<Self, VectorError> {
        Self::check(index)?;
        self.elems[index] = value;
        Ok(self)
    }

    #[inline]
    pub fn map(self, f: impl FnMut(T) -> T) -> Self {
        Self {
            elems: self.elems.map(f),
        }
    }

    /// Applies `f` lane-for-lane; lane `i` of the result depends only on lane `i` of each input.
    #[inline]
    pub fn zip_map(self, rhs: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Self {
            elems: core::array::from_fn(|i| f(self.elems[i], rhs.elems[i])),
        }
    }

    /// Strict left-to-right fold seeded with lane 0; the association order is never changed.
    #[inline]
    pub fn fold_left(self, mut f: impl FnMut(T, T) -> T) -> T {
        const { assert!(N > 0, "reduction over an empty vector") };
        let mut acc = self.elems[0];
        for &elem in &self.elems[1..] {
            acc = f(acc, elem);
        }
        acc
    }
}

impl<T: Lane + Integer, const N: usize> Vector<T, N> {
    /// Lane `index` reinterpreted as signed.
    pub fn extract_signed(&self, index: usize) -> Result<T::Signed, VectorError> {
        self.extract(index).map(Integer::to_signed)
    }

    /// Stores the unsigned bit pattern of `value` at lane `index`.
    pub fn insert_signed(self, index: usize, value: T::Signed) -> Result<Self, VectorError> {
        self.insert(index, T::from_bits128(value.to_bits128()))
    }
}

/// Implemented when an aggregate of `Self`'s length fits in the lanes of `A`.
///
/// Narrower aggregates are accepted wherever the destination zero-fills; the lane types must match.
pub trait FitsWithin<A: Aggregate>: Aggregate<Elem = A::Elem> {}

macro_rules! fits_within {
    ($($n:literal: $($m:literal)*;)*) => {$($(
        impl<T: Lane> FitsWithin<Vector<T, $n>> for Vector<T, $m> {}
    )*)*};
}

fits_within! {
    1: 1;
    2: 1 2;
    4: 1 2 3 4;
    8: 1 2 3 4 5 6 7 8;
    16: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16;
    32: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32;
    64: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
        33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48 49 50 51 52 53 54 55 56 57 58 59 60 61
        62 63 64;
}

/// Lane `T` at the start of `bytes`.
#[inline]
pub(crate) fn load_lane<T: Lane>(bytes: &[u8]) -> T {
    let mut buf = [0u8; 16];
    buf[..T::BYTES].copy_from_slice(&bytes[..T::BYTES]);
    T::from_bits128(u128::from_le_bytes(buf))
}

#[inline]
pub(crate) fn store_lane<T: Lane>(bytes: &mut [u8], value: T) {
    bytes[..T::BYTES].copy_from_slice(&value.to_bits128().to_le_bytes()[..T::BYTES]);
}
