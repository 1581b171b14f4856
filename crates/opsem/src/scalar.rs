//! Element types that operands are parameterized over.
//!
//! The set is closed: `bool`, unsigned and signed integers of 8 to 128 bits, `f32`, `f64`, and the
//! [`F80`] marker for 80-bit extended floats (which are only ever carried as `f64`). Every
//! width-sensitive primitive in the crate is written once against these traits and instantiated
//! over the set, rather than spelled out per width.

use core::fmt::Debug;
use core::hash::Hash;

/// Anything an operand can name: a scalar, the extended-float marker, or vector lane storage.
pub trait Element: 'static {
    /// Declared width in bytes.
    const BYTES: usize;
    /// Declared width in bits.
    const BITS: u32 = (Self::BYTES * 8) as u32;
}

/// A value that fits in a single register or memory slot.
pub trait Scalar: Element + Copy + Default + PartialEq + PartialOrd + Debug {
    /// The unsigned integer of the same width. Size queries on an operand return this type.
    type Bits: Integer;
}

/// Raw bit-pattern access, zero-extended to 128 bits.
pub trait BitPattern: Scalar {
    /// The value's bit pattern, zero-extended from its own width.
    fn to_bits128(self) -> u128;
    /// Rebuild a value from the low `Self::BITS` bits of `bits`.
    fn from_bits128(bits: u128) -> Self;
}

/// Fixed-width two's complement integers.
pub trait Integer: BitPattern + Eq + Ord + Hash {
    type Unsigned: Integer;
    type Signed: Integer;

    /// Bit-identical reinterpretation as the unsigned type of the same width.
    fn to_unsigned(self) -> Self::Unsigned;
    /// Bit-identical reinterpretation as the signed type of the same width.
    fn to_signed(self) -> Self::Signed;
    /// The signed view of the value, sign-extended to 128 bits.
    fn to_i128(self) -> i128;
}

/// Sources a zero-extension accepts: the integers and `bool`.
pub trait ZeroExtendable: BitPattern {}

/// Implemented when `Self` is no wider than `D`.
///
/// Every widening conversion and every narrowing one (with the roles swapped) is bounded on this,
/// so a width mismatch is a type error at the call site.
pub trait NoWiderThan<D: Element>: Element {}

/// Types with representable lower and upper bounds.
pub trait Bounded: Scalar {
    const LOWEST: Self;
    const HIGHEST: Self;
}

/// Integers with a type of twice their width.
pub trait Widen: Integer {
    type Wider: Integer;
}

/// Integers with a type of half their width.
pub trait Narrow: Integer {
    type Narrower: Integer;
}

/// 80-bit x87 extended precision.
///
/// Only memory operands use this element type. Loads produce an `f64` and stores take one, so
/// values lose the extra precision of the 64-bit significand. Downstream tooling sees the
/// dedicated extended-float intrinsics and may substitute a wider representation there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct F80;

impl Element for F80 {
    const BYTES: usize = 10;
}

macro_rules! impl_integer {
    ($($t:ty => $u:ty, $s:ty;)*) => {$(
        impl Element for $t {
            const BYTES: usize = core::mem::size_of::<$t>();
        }

        impl Scalar for $t {
            type Bits = $u;
        }

        impl BitPattern for $t {
            #[inline]
            fn to_bits128(self) -> u128 {
                self as $u as u128
            }

            #[inline]
            fn from_bits128(bits: u128) -> Self {
                bits as $u as $t
            }
        }

        impl Integer for $t {
            type Unsigned = $u;
            type Signed = $s;

            #[inline]
            fn to_unsigned(self) -> $u {
                self as $u
            }

            #[inline]
            fn to_signed(self) -> $s {
                self as $s
            }

            #[inline]
            fn to_i128(self) -> i128 {
                self as $s as i128
            }
        }

        impl Bounded for $t {
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;
        }

        impl ZeroExtendable for $t {}
    )*};
}

impl_integer! {
    u8 => u8, i8;
    u16 => u16, i16;
    u32 => u32, i32;
    u64 => u64, i64;
    u128 => u128, i128;
    i8 => u8, i8;
    i16 => u16, i16;
    i32 => u32, i32;
    i64 => u64, i64;
    i128 => u128, i128;
}

macro_rules! impl_float {
    ($($t:ty => $bits:ty;)*) => {$(
        impl Element for $t {
            const BYTES: usize = core::mem::size_of::<$t>();
        }

        impl Scalar for $t {
            type Bits = $bits;
        }

        impl BitPattern for $t {
            #[inline]
            fn to_bits128(self) -> u128 {
                self.to_bits() as u128
            }

            #[inline]
            fn from_bits128(bits: u128) -> Self {
                <$t>::from_bits(bits as $bits)
            }
        }

        impl Bounded for $t {
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;
        }
    )*};
}

impl_float! {
    f32 => u32;
    f64 => u64;
}

impl Element for bool {
    const BYTES: usize = 1;
}

impl Scalar for bool {
    type Bits = u8;
}

impl BitPattern for bool {
    #[inline]
    fn to_bits128(self) -> u128 {
        self as u128
    }

    #[inline]
    fn from_bits128(bits: u128) -> Self {
        bits & 1 != 0
    }
}

impl Bounded for bool {
    const LOWEST: Self = false;
    const HIGHEST: Self = true;
}

impl ZeroExtendable for bool {}

macro_rules! impl_resize {
    ($($narrow:ty => $wide:ty;)*) => {$(
        impl Widen for $narrow {
            type Wider = $wide;
        }

        impl Narrow for $wide {
            type Narrower = $narrow;
        }
    )*};
}

impl_resize! {
    u8 => u16;
    u16 => u32;
    u32 => u64;
    u64 => u128;
    i8 => i16;
    i16 => i32;
    i32 => i64;
    i64 => i128;
}

macro_rules! no_wider_than {
    (@pair $src:ty [$($dst:ty),*]) => {$(
        impl NoWiderThan<$dst> for $src {}
    )*};
    (@each [$($src:ty),*] $dsts:tt) => {$(
        no_wider_than!(@pair $src $dsts);
    )*};
    ($([$($src:ty),*] => [$($dst:ty),*];)*) => {$(
        no_wider_than!(@each [$($src),*] [$($dst),*]);
    )*};
}

no_wider_than! {
    [bool, u8, i8] => [bool, u8, i8, u16, i16, u32, i32, f32, u64, i64, f64, u128, i128];
    [u16, i16] => [u16, i16, u32, i32, f32, u64, i64, f64, u128, i128];
    [u32, i32, f32] => [u32, i32, f32, u64, i64, f64, u128, i128];
    [u64, i64, f64] => [u64, i64, f64, u128, i128];
    [u128, i128] => [u128, i128];
}
