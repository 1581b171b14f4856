//! Whole-aggregate reads and writes.
//!
//! Register-resident vectors transfer as one unit and never touch the memory token. Memory-resident
//! vectors transfer one lane per intrinsic call, in ascending lane order; each store consumes the
//! token produced by the previous one.
//!
//! A plain 32 or 64-bit register can also stand in for a vector operand, for moves between
//! general-purpose and vector registers.

use super::{Aggregate, FitsWithin, Lane, LaneView, Vector, VectorStorage};
use crate::intrinsics::Intrinsics;
use crate::memory::Memory;
use crate::operand::{MemVecRead, MemVecWrite, RegRead, RegWrite, VecRegRead, VecRegWrite};
use crate::scalar::{BitPattern, Element};
use crate::Addr;

/// Vector operands an aggregate of `T` lanes can be read from.
pub trait VectorReadable<T: Lane> {
    type Agg: Aggregate<Elem = T>;

    fn read_vector<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> Self::Agg;
}

/// Vector operands with lanes of `T`.
pub trait VectorWritable<T: Lane> {
    /// Writes `value` to lane 0 and zero to every other lane.
    fn write_scalar<B: Intrinsics + ?Sized>(self, bus: &mut B, memory: Memory, value: T) -> Memory;
}

/// Vector operands the aggregate `V` can be written to.
///
/// Registers take any aggregate no longer than themselves and zero the lanes past it. Memory
/// operands take exactly the aggregate that covers them; anything else does not type-check.
pub trait AggregateWritable<V: Aggregate>: VectorWritable<V::Elem> {
    fn write_vector<B: Intrinsics + ?Sized>(self, bus: &mut B, memory: Memory, value: V) -> Memory;
}

#[inline]
fn lane_addr<T: Lane>(base: Addr, index: usize) -> Addr {
    base.wrapping_add((index * T::BYTES) as Addr)
}

fn load_lanes<T: Lane, A: Aggregate<Elem = T>, B: Intrinsics + ?Sized>(
    bus: &mut B,
    memory: &Memory,
    base: Addr,
) -> A {
    A::from_fn(|i| T::load(bus, memory, lane_addr::<T>(base, i)))
}

fn store_lanes<T: Lane, B: Intrinsics + ?Sized>(
    bus: &mut B,
    mut memory: Memory,
    base: Addr,
    lanes: impl IntoIterator<Item = T>,
) -> Memory {
    for (i, lane) in lanes.into_iter().enumerate() {
        memory = T::store(bus, memory, lane_addr::<T>(base, i), lane);
    }
    memory
}

impl<T: Lane, R: LaneView<T>> VectorReadable<T> for VecRegRead<R> {
    type Agg = R::Agg;

    #[inline]
    fn read_vector<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> R::Agg {
        LaneView::<T>::lanes(&self.0)
    }
}

impl<T: Lane, R: LaneView<T>> VectorReadable<T> for VecRegWrite<'_, R> {
    type Agg = R::Agg;

    #[inline]
    fn read_vector<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> R::Agg {
        LaneView::<T>::lanes(&*self.0)
    }
}

impl<T: Lane, R: LaneView<T>> VectorReadable<T> for MemVecRead<R> {
    type Agg = R::Agg;

    #[inline]
    fn read_vector<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> R::Agg {
        load_lanes(bus, memory, self.addr())
    }
}

impl<T: Lane, R: LaneView<T>> VectorReadable<T> for MemVecWrite<R> {
    type Agg = R::Agg;

    #[inline]
    fn read_vector<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> R::Agg {
        load_lanes(bus, memory, self.addr())
    }
}

impl<T: Lane, R: LaneView<T>> VectorWritable<T> for VecRegWrite<'_, R> {
    #[inline]
    fn write_scalar<B: Intrinsics + ?Sized>(
        self,
        _bus: &mut B,
        memory: Memory,
        value: T,
    ) -> Memory {
        let bytes = VectorStorage::bytes_mut(self.0);
        bytes.fill(0);
        super::store_lane(bytes, value);
        memory
    }
}

impl<T: Lane, R: LaneView<T>, const M: usize> AggregateWritable<Vector<T, M>>
    for VecRegWrite<'_, R>
where
    Vector<T, M>: FitsWithin<R::Agg>,
{
    #[inline]
    fn write_vector<B: Intrinsics + ?Sized>(
        self,
        _bus: &mut B,
        memory: Memory,
        value: Vector<T, M>,
    ) -> Memory {
        self.0.set_lanes(&value);
        memory
    }
}

impl<T: Lane, R: LaneView<T>> VectorWritable<T> for MemVecWrite<R> {
    #[inline]
    fn write_scalar<B: Intrinsics + ?Sized>(self, bus: &mut B, memory: Memory, value: T) -> Memory {
        let lanes = R::Agg::from_fn(|i| if i == 0 { value } else { T::default() });
        store_lanes(bus, memory, self.addr(), lanes.as_slice().iter().copied())
    }
}

impl<T: Lane, R, const N: usize> AggregateWritable<Vector<T, N>> for MemVecWrite<R>
where
    R: LaneView<T, Agg = Vector<T, N>>,
{
    #[inline]
    fn write_vector<B: Intrinsics + ?Sized>(
        self,
        bus: &mut B,
        memory: Memory,
        value: Vector<T, N>,
    ) -> Memory {
        store_lanes(bus, memory, self.addr(), value.elems)
    }
}

#[inline]
fn pack_lanes<T: Lane>(lanes: &[T]) -> u128 {
    lanes.iter().enumerate().fold(0, |acc, (i, lane)| {
        acc | lane.to_bits128() << (i as u32 * <T as Element>::BITS)
    })
}

macro_rules! scalar_register_lanes {
    ($($reg:ty: $($t:ty => $n:literal),*;)*) => {$($(
        /// The register value lands in lane 0; every other lane reads as zero.
        impl VectorReadable<$t> for RegRead<$reg> {
            type Agg = Vector<$t, $n>;

            #[inline]
            fn read_vector<B: Intrinsics + ?Sized>(
                &self,
                _bus: &mut B,
                _memory: &Memory,
            ) -> Vector<$t, $n> {
                let mut lanes = Vector::<$t, $n>::zeroed();
                lanes.elems[0] = <$t>::from_bits128(self.0.to_bits128());
                lanes
            }
        }

        /// Views the whole register slot as lanes.
        impl VectorReadable<$t> for RegWrite<'_, $reg> {
            type Agg = Vector<$t, $n>;

            #[inline]
            fn read_vector<B: Intrinsics + ?Sized>(
                &self,
                _bus: &mut B,
                _memory: &Memory,
            ) -> Vector<$t, $n> {
                let bits = self.0.to_bits128();
                Vector::from_fn(|i| <$t>::from_bits128(bits >> (i as u32 * <$t as Element>::BITS)))
            }
        }

        impl VectorWritable<$t> for RegWrite<'_, $reg> {
            #[inline]
            fn write_scalar<B: Intrinsics + ?Sized>(
                self,
                _bus: &mut B,
                memory: Memory,
                value: $t,
            ) -> Memory {
                *self.0 = <$reg>::from_bits128(value.to_bits128());
                memory
            }
        }

        impl<const M: usize> AggregateWritable<Vector<$t, M>> for RegWrite<'_, $reg>
        where
            Vector<$t, M>: FitsWithin<Vector<$t, $n>>,
        {
            #[inline]
            fn write_vector<B: Intrinsics + ?Sized>(
                self,
                _bus: &mut B,
                memory: Memory,
                value: Vector<$t, M>,
            ) -> Memory {
                *self.0 = <$reg>::from_bits128(pack_lanes(&value.elems));
                memory
            }
        }
    )*)*};
}

scalar_register_lanes! {
    u32: u8 => 4, u16 => 2, u32 => 1, f32 => 1;
    f32: u8 => 4, u16 => 2, u32 => 1, f32 => 1;
    u64: u8 => 8, u16 => 4, u32 => 2, u64 => 1, f32 => 2, f64 => 1;
    f64: u8 => 8, u16 => 4, u32 => 2, u64 => 1, f32 => 2, f64 => 1;
}
