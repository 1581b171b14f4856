//! Scalar operator family.
//!
//! Arithmetic and bitwise operators promote both operands to the modeled machine's natural word
//! ([`Addr`] for unsigned, [`AddrDiff`] for signed sub-word types), compute there, and narrow the
//! result back to the declared type. For sub-word types this is observable: shifting a `u8` by 8
//! yields 0 instead of overflowing, and wraparound always happens at the declared width.
//! Comparisons never widen.

use crate::scalar::{Integer, Scalar};
use crate::{Addr, AddrDiff};

/// Operations on the promoted (machine-word or wider) representation.
pub trait WideArith: Copy {
    fn wide_add(self, rhs: Self) -> Self;
    fn wide_sub(self, rhs: Self) -> Self;
    fn wide_mul(self, rhs: Self) -> Self;
    fn wide_div(self, rhs: Self) -> Self;
    fn wide_neg(self) -> Self;
}

/// Integer-only operations on the promoted representation.
///
/// Shift amounts that are negative or not smaller than the promoted width shift every bit out: the
/// result is 0, or the sign fill for an arithmetic right shift.
pub trait WideBits: WideArith {
    fn wide_rem(self, rhs: Self) -> Self;
    fn wide_and(self, rhs: Self) -> Self;
    fn wide_and_not(self, rhs: Self) -> Self;
    fn wide_or(self, rhs: Self) -> Self;
    fn wide_xor(self, rhs: Self) -> Self;
    fn wide_shl(self, rhs: Self) -> Self;
    fn wide_shr(self, rhs: Self) -> Self;
    fn wide_not(self) -> Self;
}

/// Scalars that take part in widen-then-narrow arithmetic.
pub trait Arithmetic: Scalar {
    type Wide: WideArith;

    fn widen(self) -> Self::Wide;
    fn narrow(wide: Self::Wide) -> Self;
}

/// Integers, which additionally support remainder, bitwise and shift operators.
pub trait Bitwise: Integer + Arithmetic<Wide: WideBits> {}

macro_rules! impl_wide_int {
    ($($t:ty => $shr_overflow:expr;)*) => {$(
        impl WideArith for $t {
            #[inline]
            fn wide_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn wide_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn wide_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn wide_div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }

            #[inline]
            fn wide_neg(self) -> Self {
                self.wrapping_neg()
            }
        }

        impl WideBits for $t {
            #[inline]
            fn wide_rem(self, rhs: Self) -> Self {
                self.wrapping_rem(rhs)
            }

            #[inline]
            fn wide_and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline]
            fn wide_and_not(self, rhs: Self) -> Self {
                self & !rhs
            }

            #[inline]
            fn wide_or(self, rhs: Self) -> Self {
                self | rhs
            }

            #[inline]
            fn wide_xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline]
            fn wide_shl(self, rhs: Self) -> Self {
                let amount = u32::try_from(rhs).unwrap_or(u32::MAX);
                self.checked_shl(amount).unwrap_or(0)
            }

            #[inline]
            fn wide_shr(self, rhs: Self) -> Self {
                let amount = u32::try_from(rhs).unwrap_or(u32::MAX);
                match self.checked_shr(amount) {
                    Some(v) => v,
                    None => {
                        let overflow: fn($t) -> $t = $shr_overflow;
                        overflow(self)
                    }
                }
            }

            #[inline]
            fn wide_not(self) -> Self {
                !self
            }
        }
    )*};
}

impl_wide_int! {
    u32 => |_| 0;
    u64 => |_| 0;
    u128 => |_| 0;
    i32 => |v| v >> (i32::BITS - 1);
    i64 => |v| v >> (i64::BITS - 1);
    i128 => |v| v >> (i128::BITS - 1);
}

macro_rules! impl_wide_float {
    ($($t:ty),*) => {$(
        impl WideArith for $t {
            #[inline]
            fn wide_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn wide_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn wide_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn wide_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn wide_neg(self) -> Self {
                -self
            }
        }
    )*};
}

impl_wide_float!(f32, f64);

macro_rules! impl_arithmetic {
    ($($t:ty => $wide:ty;)*) => {$(
        impl Arithmetic for $t {
            type Wide = $wide;

            #[inline]
            fn widen(self) -> $wide {
                self as $wide
            }

            #[inline]
            fn narrow(wide: $wide) -> Self {
                wide as $t
            }
        }
    )*};
}

impl_arithmetic! {
    u8 => Addr;
    u16 => Addr;
    u32 => Addr;
    u64 => u64;
    u128 => u128;
    i8 => AddrDiff;
    i16 => AddrDiff;
    i32 => AddrDiff;
    i64 => i64;
    i128 => i128;
    f32 => f32;
    f64 => f64;
}

impl Bitwise for u8 {}
impl Bitwise for u16 {}
impl Bitwise for u32 {}
impl Bitwise for u64 {}
impl Bitwise for u128 {}
impl Bitwise for i8 {}
impl Bitwise for i16 {}
impl Bitwise for i32 {}
impl Bitwise for i64 {}
impl Bitwise for i128 {}

macro_rules! binary_ops {
    ($bound:ident: $($(#[$meta:meta])* $name:ident => $wide:ident;)*) => {$(
        $(#[$meta])*
        #[inline]
        pub fn $name<T: $bound>(lhs: T, rhs: T) -> T {
            T::narrow(lhs.widen().$wide(rhs.widen()))
        }
    )*};
}

macro_rules! unary_ops {
    ($bound:ident: $($(#[$meta:meta])* $name:ident => $wide:ident;)*) => {$(
        $(#[$meta])*
        #[inline]
        pub fn $name<T: $bound>(value: T) -> T {
            T::narrow(value.widen().$wide())
        }
    )*};
}

binary_ops! {
    Arithmetic:
    add => wide_add;
    sub => wide_sub;
    mul => wide_mul;
    /// Integer division by zero panics, like the primitive operator; semantics raise the
    /// architectural divide fault before getting here.
    div => wide_div;
}

binary_ops! {
    Bitwise:
    rem => wide_rem;
    and => wide_and;
    /// `lhs & !rhs`.
    and_not => wide_and_not;
    or => wide_or;
    xor => wide_xor;
    shl => wide_shl;
    /// Logical for unsigned types, arithmetic for signed types.
    shr => wide_shr;
}

unary_ops! {
    Arithmetic:
    neg => wide_neg;
}

unary_ops! {
    Bitwise:
    not => wide_not;
}

#[inline]
pub fn cmp_eq<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs == rhs
}

#[inline]
pub fn cmp_neq<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs != rhs
}

#[inline]
pub fn cmp_lt<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs < rhs
}

#[inline]
pub fn cmp_lte<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs <= rhs
}

#[inline]
pub fn cmp_gt<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs > rhs
}

#[inline]
pub fn cmp_gte<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs >= rhs
}

#[inline]
pub fn b_and(a: bool, b: bool) -> bool {
    a && b
}

#[inline]
pub fn b_or(a: bool, b: bool) -> bool {
    a || b
}

#[inline]
pub fn b_xor(a: bool, b: bool) -> bool {
    a != b
}

#[inline]
pub fn b_xnor(a: bool, b: bool) -> bool {
    a == b
}

#[inline]
pub fn b_not(a: bool) -> bool {
    !a
}

#[inline]
pub fn select<T>(cond: bool, if_true: T, if_false: T) -> T {
    if cond {
        if_true
    } else {
        if_false
    }
}

#[inline]
pub fn identity<T>(value: T) -> T {
    value
}
