//! Lane-wise operators and reductions.
//!
//! The unprefixed forms compute in the lane type itself (unsigned integers or floats). The `s_`
//! forms reinterpret integer lanes as signed, compute there, and store the unsigned bit pattern.

use super::{Lane, Vector};
use crate::ops::{self, Arithmetic, Bitwise};
use crate::scalar::{BitPattern, Integer};

#[inline]
fn via_signed<T: Integer>(value: T::Signed) -> T {
    T::from_bits128(value.to_bits128())
}

macro_rules! binary_broadcast {
    ($bound:ident: $($name:ident, $signed:ident => $op:ident;)*) => {$(
        #[inline]
        pub fn $name<T: Lane + $bound, const N: usize>(
            lhs: Vector<T, N>,
            rhs: Vector<T, N>,
        ) -> Vector<T, N> {
            lhs.zip_map(rhs, ops::$op)
        }

        #[inline]
        pub fn $signed<T, const N: usize>(lhs: Vector<T, N>, rhs: Vector<T, N>) -> Vector<T, N>
        where
            T: Lane + Integer,
            T::Signed: Bitwise,
        {
            lhs.zip_map(rhs, |a, b| via_signed::<T>(ops::$op(a.to_signed(), b.to_signed())))
        }
    )*};
}

macro_rules! unary_broadcast {
    ($bound:ident: $($name:ident, $signed:ident => $op:ident;)*) => {$(
        #[inline]
        pub fn $name<T: Lane + $bound, const N: usize>(value: Vector<T, N>) -> Vector<T, N> {
            value.map(ops::$op)
        }

        #[inline]
        pub fn $signed<T, const N: usize>(value: Vector<T, N>) -> Vector<T, N>
        where
            T: Lane + Integer,
            T::Signed: Bitwise,
        {
            value.map(|a| via_signed::<T>(ops::$op(a.to_signed())))
        }
    )*};
}

macro_rules! accumulate {
    ($bound:ident: $($name:ident, $signed:ident => $op:ident;)*) => {$(
        /// Left-to-right reduction seeded with lane 0.
        #[inline]
        pub fn $name<T: Lane + $bound, const N: usize>(value: Vector<T, N>) -> T {
            value.fold_left(ops::$op)
        }

        #[inline]
        pub fn $signed<T, const N: usize>(value: Vector<T, N>) -> T
        where
            T: Lane + Integer,
            T::Signed: Bitwise,
        {
            value.fold_left(|acc, elem| {
                via_signed::<T>(ops::$op(acc.to_signed(), elem.to_signed()))
            })
        }
    )*};
}

binary_broadcast! {
    Arithmetic:
    add_v, s_add_v => add;
    sub_v, s_sub_v => sub;
    mul_v, s_mul_v => mul;
    div_v, s_div_v => div;
}

binary_broadcast! {
    Bitwise:
    rem_v, s_rem_v => rem;
    and_v, s_and_v => and;
    and_not_v, s_and_not_v => and_not;
    or_v, s_or_v => or;
    xor_v, s_xor_v => xor;
    shl_v, s_shl_v => shl;
    shr_v, s_shr_v => shr;
}

unary_broadcast! {
    Arithmetic:
    neg_v, s_neg_v => neg;
}

unary_broadcast! {
    Bitwise:
    not_v, s_not_v => not;
}

accumulate! {
    Arithmetic:
    accumulate_add_v, s_accumulate_add_v => add;
}

accumulate! {
    Bitwise:
    accumulate_and_v, s_accumulate_and_v => and;
    accumulate_and_not_v, s_accumulate_and_not_v => and_not;
    accumulate_or_v, s_accumulate_or_v => or;
    accumulate_xor_v, s_accumulate_xor_v => xor;
}

/// The all-zero aggregate with the shape of `value`.
#[inline]
pub fn clear_v<T: Lane, const N: usize>(value: Vector<T, N>) -> Vector<T, N> {
    value.cleared()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(target_arch = "wasm32"))]
    use proptest::prelude::*;

    #[test]
    fn lanes_wrap_independently() {
        let l = Vector::new([0xFFu8, 0x01, 0x80, 0x00]);
        let r = Vector::new([0x01u8, 0x01, 0x80, 0xFF]);
        assert_eq!(add_v(l, r).elems, [0x00, 0x02, 0x00, 0xFF]);
        assert_eq!(sub_v(l, r).elems, [0xFE, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn signed_lanes_store_the_unsigned_pattern() {
        let l = Vector::new([0xFFF0u16, 0x0010]);
        let r = Vector::new([0x0002u16, 0xFFFE]);
        // -16 / 2 = -8 and 16 / -2 = -8
        assert_eq!(s_div_v(l, r).elems, [0xFFF8, 0xFFF8]);
        assert_eq!(div_v(l, r).elems, [0x7FF8, 0x0000]);
        assert_eq!(s_shr_v(l, Vector::new([2, 2])).elems, [0xFFFC, 0x0004]);
        assert_eq!(shr_v(l, Vector::new([2, 2])).elems, [0x3FFC, 0x0004]);
        assert_eq!(s_neg_v(Vector::new([1u32, 0])).elems, [u32::MAX, 0]);
    }

    #[test]
    fn float_lanes() {
        let l = Vector::new([1.0f32, -2.0, 0.5, 8.0]);
        let r = Vector::new([2.0f32, 2.0, 0.5, -4.0]);
        assert_eq!(mul_v(l, r).elems, [2.0, -4.0, 0.25, -32.0]);
        assert_eq!(neg_v(l).elems, [-1.0, 2.0, -0.5, -8.0]);
        assert_eq!(clear_v(l).elems, [0.0; 4]);
    }

    #[test]
    fn bitwise_lanes() {
        let l = Vector::new([0b1100u64, u64::MAX]);
        let r = Vector::new([0b1010u64, 1]);
        assert_eq!(and_not_v(l, r).elems, [0b0100, u64::MAX - 1]);
        assert_eq!(not_v(l).elems, [!0b1100, 0]);
        assert_eq!(shl_v(l, Vector::new([64, 63])).elems, [0, 1 << 63]);
        assert_eq!(rem_v(l, Vector::new([5, 10])).elems, [2, 5]);
    }

    #[test]
    fn float_reduction_is_not_reassociated() {
        // 1e8 + 1 rounds back to 1e8 in f32, so only the left fold lands on 1.
        let v = Vector::new([1e8f32, 1.0, -1e8, 1.0]);
        assert_eq!(accumulate_add_v(v), 1.0);
    }

    #[test]
    fn integer_reductions() {
        let v = Vector::new([0xF0u8, 0x3C, 0x0F]);
        assert_eq!(accumulate_and_v(v), 0x00);
        assert_eq!(accumulate_or_v(v), 0xFF);
        assert_eq!(accumulate_xor_v(v), 0xC3);
        assert_eq!(accumulate_and_not_v(v), 0xC0);
        assert_eq!(s_accumulate_add_v(Vector::new([0xFFu8, 0xFF, 0x03])), 0x01);
        assert_eq!(accumulate_add_v(Vector::new([5u128])), 5);
    }

    #[cfg(not(target_arch = "wasm32"))]
    proptest! {
        #[test]
        fn broadcast_preserves_lane_index(l in any::<[u32; 4]>(), r in any::<[u32; 4]>()) {
            let (lv, rv) = (Vector::new(l), Vector::new(r));
            let sum = add_v(lv, rv);
            let signed = s_mul_v(lv, rv);
            let xored = xor_v(lv, rv);
            for i in 0..4 {
                prop_assert_eq!(sum.elems[i], ops::add(l[i], r[i]));
                prop_assert_eq!(signed.elems[i], ops::mul(l[i] as i32, r[i] as i32) as u32);
                prop_assert_eq!(xored.elems[i], l[i] ^ r[i]);
            }
        }

        #[test]
        fn reduction_matches_a_left_fold(v in any::<[i16; 8]>()) {
            let lanes = Vector::new(v.map(|e| e as u16));
            let expected = v.iter().skip(1).fold(v[0], |acc, &e| acc.wrapping_add(e));
            prop_assert_eq!(s_accumulate_add_v(lanes), expected as u16);
        }
    }
}
