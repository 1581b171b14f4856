use core::fmt;

use super::{load_lane, store_lane, Aggregate, FitsWithin, Lane, Vector};
use crate::scalar::Element;

/// Byte storage backing a vector register.
pub trait VectorStorage: Element + Copy + Default {
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];

    fn bytes_view(&self) -> <Self as LaneView<u8>>::Agg
    where
        Self: LaneView<u8>,
    {
        self.lanes()
    }

    fn words(&self) -> <Self as LaneView<u16>>::Agg
    where
        Self: LaneView<u16>,
    {
        self.lanes()
    }

    fn dwords(&self) -> <Self as LaneView<u32>>::Agg
    where
        Self: LaneView<u32>,
    {
        self.lanes()
    }

    fn qwords(&self) -> <Self as LaneView<u64>>::Agg
    where
        Self: LaneView<u64>,
    {
        self.lanes()
    }

    fn dqwords(&self) -> <Self as LaneView<u128>>::Agg
    where
        Self: LaneView<u128>,
    {
        self.lanes()
    }

    fn floats(&self) -> <Self as LaneView<f32>>::Agg
    where
        Self: LaneView<f32>,
    {
        self.lanes()
    }

    fn doubles(&self) -> <Self as LaneView<f64>>::Agg
    where
        Self: LaneView<f64>,
    {
        self.lanes()
    }
}

/// A view of vector storage as lanes of `T`.
pub trait LaneView<T: Lane>: VectorStorage {
    /// The aggregate that exactly covers the storage.
    type Agg: Aggregate<Elem = T>;

    #[inline]
    fn lanes(&self) -> Self::Agg {
        let bytes = self.bytes();
        Self::Agg::from_fn(|i| load_lane(&bytes[i * T::BYTES..]))
    }

    /// Overwrites the storage with `value` in the low lanes and zero in every lane past it.
    ///
    /// `value` may be narrower than the storage, never wider:
    ///
    /// ```compile_fail
    /// use opsem::vector::{LaneView, Vector, V64};
    ///
    /// let mut reg = V64::default();
    /// reg.set_lanes(&Vector::new([1u32, 2, 3]));
    /// ```
    #[inline]
    fn set_lanes<const M: usize>(&mut self, value: &Vector<T, M>)
    where
        Vector<T, M>: FitsWithin<Self::Agg>,
    {
        let bytes = self.bytes_mut();
        bytes.fill(0);
        for (i, &elem) in value.elems.iter().enumerate() {
            store_lane(&mut bytes[i * T::BYTES..], elem);
        }
    }
}

macro_rules! vector_storage {
    ($($(#[$meta:meta])* $name:ident($bytes:literal);)*) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; $bytes]);

        impl $name {
            #[inline]
            pub const fn from_le_bytes(bytes: [u8; $bytes]) -> Self {
                Self(bytes)
            }

            #[inline]
            pub const fn to_le_bytes(self) -> [u8; $bytes] {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0; $bytes])
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(0x"))?;
                for byte in self.0.iter().rev() {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str(")")
            }
        }

        impl Element for $name {
            const BYTES: usize = $bytes;
        }

        impl VectorStorage for $name {
            #[inline]
            fn bytes(&self) -> &[u8] {
                &self.0
            }

            #[inline]
            fn bytes_mut(&mut self) -> &mut [u8] {
                &mut self.0
            }
        }
    )*};
}

vector_storage! {
    /// 64-bit vector storage (MMX-sized).
    V64(8);
    /// 128-bit vector storage (XMM-sized).
    V128(16);
    /// 256-bit vector storage (YMM-sized).
    V256(32);
    /// 512-bit vector storage (ZMM-sized).
    V512(64);
}

macro_rules! lane_views {
    ($($name:ident($bytes:literal): $($t:ty),*;)*) => {$($(
        impl LaneView<$t> for $name {
            type Agg = Vector<$t, { $bytes / core::mem::size_of::<$t>() }>;
        }
    )*)*};
}

lane_views! {
    V64(8): u8, u16, u32, u64, f32, f64;
    V128(16): u8, u16, u32, u64, u128, f32, f64;
    V256(32): u8, u16, u32, u64, u128, f32, f64;
    V512(64): u8, u16, u32, u64, u128, f32, f64;
}

impl From<u128> for V128 {
    fn from(value: u128) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<V128> for u128 {
    fn from(value: V128) -> Self {
        u128::from_le_bytes(value.0)
    }
}

impl From<u64> for V64 {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<V64> for u64 {
    fn from(value: V64) -> Self {
        u64::from_le_bytes(value.0)
    }
}
