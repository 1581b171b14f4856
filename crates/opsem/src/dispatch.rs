//! Scalar read/write dispatch over operand categories.

use crate::intrinsics::{Intrinsics, MemoryScalar};
use crate::memory::Memory;
use crate::operand::{Imm, MemRead, MemWrite, RegRead, RegWrite};
use crate::scalar::Scalar;

/// Operands a scalar value can be read from.
pub trait Readable {
    type Value: Copy;

    fn read_value<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> Self::Value;
}

/// Operands a scalar value can be written to.
///
/// Register writes hand back the token they were given: register effects are unordered with
/// respect to memory. Memory writes hand back its successor.
pub trait Writable {
    type Value: Copy;

    fn write_value<B: Intrinsics + ?Sized>(
        self,
        bus: &mut B,
        memory: Memory,
        value: Self::Value,
    ) -> Memory;
}

impl<T: Copy> Readable for RegRead<T> {
    type Value = T;

    #[inline]
    fn read_value<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> T {
        self.0
    }
}

impl<T: Copy> Readable for Imm<T> {
    type Value = T;

    #[inline]
    fn read_value<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> T {
        self.0
    }
}

impl<T: Copy> Readable for RegWrite<'_, T> {
    type Value = T;

    #[inline]
    fn read_value<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> T {
        *self.0
    }
}

impl<T: MemoryScalar> Readable for MemRead<T> {
    type Value = T::Value;

    #[inline]
    fn read_value<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> T::Value {
        T::load(bus, memory, self.addr())
    }
}

impl<T: MemoryScalar> Readable for MemWrite<T> {
    type Value = T::Value;

    #[inline]
    fn read_value<B: Intrinsics + ?Sized>(&self, bus: &mut B, memory: &Memory) -> T::Value {
        T::load(bus, memory, self.addr())
    }
}

macro_rules! impl_bare_readable {
    ($($t:ty),*) => {$(
        impl Readable for $t {
            type Value = $t;

            #[inline]
            fn read_value<B: Intrinsics + ?Sized>(&self, _bus: &mut B, _memory: &Memory) -> $t {
                *self
            }
        }
    )*};
}

impl_bare_readable!(bool, u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl<T: Copy> Writable for RegWrite<'_, T> {
    type Value = T;

    #[inline]
    fn write_value<B: Intrinsics + ?Sized>(self, _bus: &mut B, memory: Memory, value: T) -> Memory {
        *self.0 = value;
        memory
    }
}

/// Plain slots, for state that is not wrapped in a register operand (flags and the like).
impl<T: Scalar> Writable for &mut T {
    type Value = T;

    #[inline]
    fn write_value<B: Intrinsics + ?Sized>(self, _bus: &mut B, memory: Memory, value: T) -> Memory {
        *self = value;
        memory
    }
}

impl<T: MemoryScalar> Writable for MemWrite<T> {
    type Value = T::Value;

    #[inline]
    fn write_value<B: Intrinsics + ?Sized>(
        self,
        bus: &mut B,
        memory: Memory,
        value: T::Value,
    ) -> Memory {
        T::store(bus, memory, self.addr(), value)
    }
}
