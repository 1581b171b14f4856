//! Width and sign conversion.
//!
//! Width preconditions (`source <= destination` for extension, `source >= destination` for
//! truncation) are [`NoWiderThan`] bounds: a violation is a type error, never a silent runtime
//! truncation or widening.

use crate::operand::Operand;
use crate::scalar::{
    BitPattern, Bounded, Element, Integer, Narrow, NoWiderThan, Scalar, Widen, ZeroExtendable,
};

/// Bit-identical reinterpretation as unsigned.
#[inline]
pub fn unsigned<T: Integer>(value: T) -> T::Unsigned {
    value.to_unsigned()
}

/// Bit-identical reinterpretation as signed.
#[inline]
pub fn signed<T: Integer>(value: T) -> T::Signed {
    value.to_signed()
}

/// Declared byte width of an operand, in the unsigned type of the operand's own width.
#[inline]
pub fn byte_size_of<O>(_op: &O) -> <O::Elem as Scalar>::Bits
where
    O: Operand + ?Sized,
    O::Elem: Scalar,
{
    <O::Elem as Scalar>::Bits::from_bits128(<O::Elem as Element>::BYTES as u128)
}

/// Declared bit width of an operand, in the unsigned type of the operand's own width.
#[inline]
pub fn bit_size_of<O>(_op: &O) -> <O::Elem as Scalar>::Bits
where
    O: Operand + ?Sized,
    O::Elem: Scalar,
{
    <O::Elem as Scalar>::Bits::from_bits128(u128::from(<O::Elem as Element>::BITS))
}

/// The largest value representable in the type of `value`.
#[inline]
pub fn maximize<T: Bounded>(_value: T) -> T {
    T::HIGHEST
}

/// The smallest value representable in the type of `value` (most negative for floats).
#[inline]
pub fn minimize<T: Bounded>(_value: T) -> T {
    T::LOWEST
}

/// Zero-extend to twice the width; the result is unsigned.
#[inline]
pub fn zero_extend<T: Widen>(value: T) -> <T::Wider as Integer>::Unsigned {
    <T::Wider as Integer>::Unsigned::from_bits128(value.to_bits128())
}

/// Sign-extend to twice the width; the result is signed.
#[inline]
pub fn sign_extend<T: Widen>(value: T) -> <T::Wider as Integer>::Signed {
    <T::Wider as Integer>::Signed::from_bits128(value.to_i128() as u128)
}

/// Truncate to half the width, keeping the signedness.
#[inline]
pub fn truncate<T: Narrow>(value: T) -> T::Narrower {
    T::Narrower::from_bits128(value.to_bits128())
}

/// Zero-extend to the width of `D`; the result is `D`'s unsigned type.
///
/// ```
/// assert_eq!(opsem::convert::zero_extend_to::<u64, _>(0x80u8), 0x80u64);
/// ```
///
/// Extending to a narrower type does not compile:
///
/// ```compile_fail
/// let _ = opsem::convert::zero_extend_to::<u16, _>(1u32);
/// ```
#[inline]
pub fn zero_extend_to<D: Integer, T: ZeroExtendable + NoWiderThan<D>>(value: T) -> D::Unsigned {
    D::Unsigned::from_bits128(value.to_bits128())
}

/// Sign-extend to the width of `D`; the result is `D`'s signed type.
///
/// ```compile_fail
/// let _ = opsem::convert::sign_extend_to::<i8, _>(-1i16);
/// ```
#[inline]
pub fn sign_extend_to<D: Integer, T: Integer + NoWiderThan<D>>(value: T) -> D::Signed {
    D::Signed::from_bits128(value.to_i128() as u128)
}

/// Truncate to the width and signedness of `D`.
///
/// ```compile_fail
/// let _ = opsem::convert::truncate_to::<u64, _>(1u32);
/// ```
#[inline]
pub fn truncate_to<D: Integer + NoWiderThan<T>, T: Integer>(value: T) -> D {
    D::from_bits128(value.to_bits128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{Imm, MemRead, RegRead};
    #[cfg(not(target_arch = "wasm32"))]
    use proptest::prelude::*;

    #[test]
    fn reinterpretation() {
        assert_eq!(unsigned(-1i32), u32::MAX);
        assert_eq!(signed(0x80u8), -128i8);
        assert_eq!(signed(unsigned(-5i64)), -5);
    }

    #[test]
    fn size_queries_use_the_operand_width() {
        let bytes: u32 = byte_size_of(&RegRead(0u32));
        assert_eq!(bytes, 4);
        let bits: u16 = bit_size_of(&MemRead::<u16>::new(0));
        assert_eq!(bits, 16);
        let bits: u8 = bit_size_of(&Imm(-1i8));
        assert_eq!(bits, 8);
        let bytes: u64 = byte_size_of(&1.0f64);
        assert_eq!(bytes, 8);
    }

    #[test]
    fn bounds() {
        assert_eq!(maximize(0u8), 0xFF);
        assert_eq!(minimize(0i8), -128);
        assert_eq!(maximize(0i64), i64::MAX);
        assert_eq!(minimize(0.0f32), f32::MIN);
        assert!(maximize(false));
    }

    #[test]
    fn double_and_half_width() {
        assert_eq!(zero_extend(0xFFu8), 0x00FFu16);
        assert_eq!(sign_extend(0xFFu8), -1i16);
        assert_eq!(sign_extend(-2i32), -2i64);
        assert_eq!(zero_extend(-1i32), 0xFFFF_FFFFu64);
        assert_eq!(truncate(0x1234_5678u32), 0x5678u16);
        assert_eq!(truncate(-2i64), -2i32);
    }

    #[test]
    fn explicit_targets() {
        assert_eq!(zero_extend_to::<u64, _>(0xABCD_1234u32), 0x0000_0000_ABCD_1234u64);
        assert_eq!(zero_extend_to::<u32, _>(true), 1u32);
        assert_eq!(zero_extend_to::<i64, _>(-1i8), 0xFFu64);
        assert_eq!(sign_extend_to::<u64, _>(0x80u8), -128i64);
        assert_eq!(sign_extend_to::<u16, _>(0x7Fu8), 0x7Fi16);
        assert_eq!(truncate_to::<u8, _>(0x1234u16), 0x34u8);
        assert_eq!(truncate_to::<i8, _>(0x1FFu32), -1i8);
        assert_eq!(truncate_to::<u32, _>(7u32), 7u32);
    }

    #[cfg(not(target_arch = "wasm32"))]
    proptest! {
        #[test]
        fn zero_extend_then_truncate_is_identity(v in any::<u16>()) {
            prop_assert_eq!(truncate_to::<u16, _>(zero_extend_to::<u32, _>(v)), v);
            prop_assert_eq!(truncate_to::<u16, _>(zero_extend_to::<u64, _>(v)), v);
            prop_assert_eq!(truncate_to::<u16, _>(zero_extend_to::<u128, _>(v)), v);
        }

        #[test]
        fn sign_extend_then_truncate_is_identity(v in any::<i32>()) {
            prop_assert_eq!(truncate_to::<i32, _>(sign_extend_to::<i64, _>(v)), v);
            prop_assert_eq!(truncate_to::<i32, _>(sign_extend_to::<u128, _>(v)), v);
            prop_assert_eq!(truncate(sign_extend(v)), v);
        }

        #[test]
        fn sign_extension_preserves_value(v in any::<i8>()) {
            prop_assert_eq!(i64::from(v), sign_extend_to::<i64, _>(v));
        }
    }
}
