//! x87 80-bit extended precision memory encoding.
//!
//! Values are carried as `f64` by the intrinsic surface; this only fixes the layout they take in
//! guest memory: a 64-bit significand with an explicit integer bit, then a 15-bit exponent (bias
//! 16383) and the sign, little-endian, 10 bytes total.

pub const EXT80_BYTES: usize = 10;

const EXP_BIAS: i32 = 16383;
const EXP_MAX: u16 = 0x7FFF;
const INT_BIT: u64 = 1 << 63;
const QUIET_BIT: u64 = 1 << 62;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ext80 {
    pub mantissa: u64,
    pub sign_exponent: u16,
}

impl Ext80 {
    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        let sign = ((bits >> 63) as u16) << 15;
        let exp = ((bits >> 52) & 0x7FF) as u16;
        let frac = bits & ((1u64 << 52) - 1);

        let (exponent, mantissa) = match exp {
            0x7FF if frac == 0 => (EXP_MAX, INT_BIT),
            // Keep the payload; the extended format always sets the integer bit on NaNs.
            0x7FF => (EXP_MAX, INT_BIT | QUIET_BIT | (frac << 11)),
            0 if frac == 0 => (0, 0),
            0 => {
                // f64 subnormals are normal numbers in the extended format.
                let top = 63 - frac.leading_zeros();
                let unbiased = top as i32 - 1074;
                ((unbiased + EXP_BIAS) as u16, frac << (63 - top))
            }
            _ => {
                let unbiased = exp as i32 - 1023;
                ((unbiased + EXP_BIAS) as u16, INT_BIT | (frac << 11))
            }
        };

        Self {
            mantissa,
            sign_exponent: sign | exponent,
        }
    }

    /// Rounds to the nearest `f64`, ties to even. Magnitudes past the `f64` range become infinities
    /// or zeros.
    pub fn to_f64(self) -> f64 {
        let negative = self.sign_exponent & 0x8000 != 0;
        let exponent = self.sign_exponent & EXP_MAX;
        let apply_sign = |v: f64| if negative { -v } else { v };

        if exponent == EXP_MAX {
            let frac = self.mantissa & !INT_BIT;
            if frac == 0 {
                return apply_sign(f64::INFINITY);
            }
            let payload = (frac >> 11) & ((1u64 << 52) - 1);
            let bits = (0x7FFu64 << 52) | payload | (1u64 << 51);
            return apply_sign(f64::from_bits(bits));
        }

        if self.mantissa == 0 {
            return apply_sign(0.0);
        }

        // Denormal extended values share the smallest normal exponent.
        let unbiased = if exponent == 0 {
            1 - EXP_BIAS
        } else {
            exponent as i32 - EXP_BIAS
        };

        // Normalize so the leading one sits in bit 63; the value is then in [2^e, 2^(e+1)).
        let lz = self.mantissa.leading_zeros();
        let m = self.mantissa << lz;
        let e = unbiased - lz as i32;
        if e > 1023 {
            return apply_sign(f64::INFINITY);
        }

        // Round once from the full significand: to 53 bits for normals, fewer below that range.
        let (shift, biased) = if e >= -1022 {
            (11, (e + 1023) as u64)
        } else {
            ((-1011 - e) as u32, 0)
        };
        if shift > 64 {
            return apply_sign(0.0);
        }
        let wide = u128::from(m);
        let rem = wide & ((1u128 << shift) - 1);
        let halfway = 1u128 << (shift - 1);
        let mut sig = (wide >> shift) as u64;
        if rem > halfway || (rem == halfway && sig & 1 == 1) {
            sig += 1;
        }
        // A carry out of the significand bumps the exponent, up to infinity.
        let bits = if biased == 0 {
            sig
        } else {
            ((biased - 1) << 52) + sig
        };
        apply_sign(f64::from_bits(bits))
    }

    pub fn to_le_bytes(self) -> [u8; EXT80_BYTES] {
        let mut out = [0u8; EXT80_BYTES];
        out[..8].copy_from_slice(&self.mantissa.to_le_bytes());
        out[8..].copy_from_slice(&self.sign_exponent.to_le_bytes());
        out
    }

    pub fn from_le_bytes(bytes: [u8; EXT80_BYTES]) -> Self {
        let [m0, m1, m2, m3, m4, m5, m6, m7, e0, e1] = bytes;
        Self {
            mantissa: u64::from_le_bytes([m0, m1, m2, m3, m4, m5, m6, m7]),
            sign_exponent: u16::from_le_bytes([e0, e1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(target_arch = "wasm32"))]
    use proptest::prelude::*;

    #[test]
    fn known_encodings() {
        assert_eq!(
            Ext80::from_f64(1.0),
            Ext80 {
                mantissa: INT_BIT,
                sign_exponent: 0x3FFF
            }
        );
        assert_eq!(
            Ext80::from_f64(-2.0),
            Ext80 {
                mantissa: INT_BIT,
                sign_exponent: 0xC000
            }
        );
        assert_eq!(Ext80::from_f64(0.0).to_le_bytes(), [0; 10]);
        assert_eq!(Ext80::from_f64(-0.0).sign_exponent, 0x8000);
        assert_eq!(
            Ext80::from_f64(f64::INFINITY),
            Ext80 {
                mantissa: INT_BIT,
                sign_exponent: 0x7FFF
            }
        );
    }

    #[test]
    fn byte_layout() {
        let bytes = Ext80::from_f64(1.0).to_le_bytes();
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 0x80, 0xFF, 0x3F]);
        assert_eq!(Ext80::from_le_bytes(bytes).to_f64(), 1.0);
    }

    #[test]
    fn special_values_decode() {
        assert!(Ext80::from_f64(f64::NAN).to_f64().is_nan());
        assert_eq!(Ext80::from_f64(f64::NEG_INFINITY).to_f64(), f64::NEG_INFINITY);
        assert!(Ext80::from_f64(-0.0).to_f64().is_sign_negative());

        let huge = Ext80 {
            mantissa: INT_BIT,
            sign_exponent: 0x7FFE,
        };
        assert_eq!(huge.to_f64(), f64::INFINITY);
        let tiny = Ext80 {
            mantissa: INT_BIT,
            sign_exponent: 0x0001,
        };
        assert_eq!(tiny.to_f64(), 0.0);
    }

    #[test]
    fn subnormals_round_trip() {
        let v = f64::from_bits(1);
        assert_eq!(Ext80::from_f64(v).to_f64(), v);
        let v = -f64::MIN_POSITIVE / 3.0;
        assert_eq!(Ext80::from_f64(v).to_f64(), v);
    }

    fn at(unbiased: i32, mantissa: u64) -> Ext80 {
        Ext80 {
            mantissa,
            sign_exponent: (unbiased + EXP_BIAS) as u16,
        }
    }

    #[test]
    fn subnormal_results_round_once() {
        // Bits below the kept 9 are just over half an ulp, so this rounds up.
        assert_eq!(at(-1065, INT_BIT | 1 << 53 | 1).to_f64().to_bits(), 513);
        // Exact ties go to even.
        assert_eq!(at(-1065, INT_BIT | 1 << 53).to_f64().to_bits(), 512);
        assert_eq!(at(-1065, INT_BIT | 1 << 54 | 1 << 53).to_f64().to_bits(), 514);
        // Half of the smallest subnormal is a tie with zero; anything above it is not.
        assert_eq!(at(-1075, INT_BIT).to_f64().to_bits(), 0);
        assert_eq!(at(-1075, INT_BIT | 1).to_f64().to_bits(), 1);
    }

    #[test]
    fn normal_results_round_to_nearest_even() {
        // 64 significant bits with the dropped 11 exactly at the halfway point.
        assert_eq!(at(0, INT_BIT | 1 << 10).to_f64(), 1.0);
        assert_eq!(at(0, INT_BIT | 1 << 11 | 1 << 10).to_f64(), 1.0 + 2f64.powi(-51));
        assert_eq!(at(1023, u64::MAX).to_f64(), f64::INFINITY);
        // Denormals and unnormals are normalized first.
        let denormal = Ext80 {
            mantissa: 1,
            sign_exponent: 0,
        };
        assert_eq!(denormal.to_f64(), 0.0);
        let unnormal = Ext80 {
            mantissa: 1 << 62,
            sign_exponent: 0x3FFF,
        };
        assert_eq!(unnormal.to_f64(), 0.5);
    }

    #[cfg(not(target_arch = "wasm32"))]
    proptest! {
        #[test]
        fn every_f64_round_trips(bits in any::<u64>()) {
            let v = f64::from_bits(bits);
            let back = Ext80::from_le_bytes(Ext80::from_f64(v).to_le_bytes()).to_f64();
            if v.is_nan() {
                prop_assert!(back.is_nan());
            } else {
                prop_assert_eq!(back.to_bits(), v.to_bits());
            }
        }
    }
}
