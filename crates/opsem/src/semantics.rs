//! The per-invocation context semantics functions are written against.

use core::mem;

use crate::dispatch::{Readable, Writable};
use crate::intrinsics::{Intrinsics, UndefinedScalar};
use crate::memory::Memory;
use crate::operand::{MemRead, MemWrite};
use crate::scalar::{BitPattern, Element, Integer, NoWiderThan, ZeroExtendable};
use crate::vector::{Aggregate, AggregateWritable, Lane, Vector, VectorReadable, VectorWritable};
use crate::Addr;

/// Owns the current memory token for one semantics invocation and routes every memory-touching
/// primitive through it.
///
/// Because the token lives here and is never handed out by value until [`Semantics::into_memory`],
/// each operation sees exactly the token left behind by the previous one.
pub struct Semantics<'b, B: Intrinsics + ?Sized> {
    bus: &'b mut B,
    memory: Memory,
}

impl<'b, B: Intrinsics + ?Sized> Semantics<'b, B> {
    pub fn new(bus: &'b mut B, memory: Memory) -> Self {
        Self { bus, memory }
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Ends the invocation, returning the final token.
    pub fn into_memory(self) -> Memory {
        self.memory
    }

    #[inline]
    fn thread(&mut self, op: impl FnOnce(&mut B, Memory) -> Memory) {
        let memory = mem::replace(&mut self.memory, Memory::vacant());
        self.memory = op(self.bus, memory);
    }

    #[inline]
    pub fn read<O: Readable>(&mut self, op: &O) -> O::Value {
        op.read_value(self.bus, &self.memory)
    }

    /// Writes `value`, whose type must be exactly the operand's value type.
    ///
    /// ```compile_fail
    /// use opsem::operand::RegWrite;
    /// use opsem::{Intrinsics, Semantics};
    ///
    /// fn mov_r32<B: Intrinsics + ?Sized>(sem: &mut Semantics<'_, B>, dst: RegWrite<'_, u32>) {
    ///     sem.write(dst, 1u64);
    /// }
    /// ```
    #[inline]
    pub fn write<O: Writable>(&mut self, op: O, value: O::Value) {
        self.thread(|bus, memory| op.write_value(bus, memory, value));
    }

    /// Writes `value` zero-extended to the operand's width.
    ///
    /// The destination must be an integer, and `value` an integer or `bool` no wider than it:
    ///
    /// ```compile_fail
    /// use opsem::operand::RegWrite;
    /// use opsem::{Intrinsics, Semantics};
    ///
    /// fn movzx_r16<B: Intrinsics + ?Sized>(sem: &mut Semantics<'_, B>, dst: RegWrite<'_, u16>) {
    ///     sem.write_zero_extended(dst, 0x1234_5678u32);
    /// }
    /// ```
    ///
    /// ```compile_fail
    /// use opsem::{Intrinsics, Semantics};
    ///
    /// fn set_flag<B: Intrinsics + ?Sized>(sem: &mut Semantics<'_, B>, flag: &mut bool) {
    ///     sem.write_zero_extended(flag, 2u8);
    /// }
    /// ```
    #[inline]
    pub fn write_zero_extended<O, V>(&mut self, op: O, value: V)
    where
        O: Writable,
        O::Value: Integer,
        V: ZeroExtendable + NoWiderThan<O::Value>,
    {
        self.write(op, O::Value::from_bits128(value.to_bits128()));
    }

    #[inline]
    pub fn read_vector<T: Lane, O: VectorReadable<T>>(&mut self, op: &O) -> O::Agg {
        op.read_vector(self.bus, &self.memory)
    }

    /// Writes a whole aggregate. Register destinations zero the lanes past it; memory destinations
    /// take exactly the aggregate that covers them:
    ///
    /// ```compile_fail
    /// use opsem::operand::MemVecWrite;
    /// use opsem::vector::{Vector, V128};
    /// use opsem::{Intrinsics, Semantics};
    ///
    /// fn store_three<B: Intrinsics + ?Sized>(sem: &mut Semantics<'_, B>) {
    ///     sem.write_v32(MemVecWrite::<V128>::new(0), Vector::new([1u32, 2, 3]));
    /// }
    /// ```
    #[inline]
    pub fn write_vector<V: Aggregate, O: AggregateWritable<V>>(&mut self, op: O, value: V) {
        self.thread(|bus, memory| op.write_vector(bus, memory, value));
    }

    /// Writes `value` into lane 0 and zeroes the rest of the operand.
    #[inline]
    pub fn write_vector_scalar<T: Lane, O: VectorWritable<T>>(&mut self, op: O, value: T) {
        self.thread(|bus, memory| op.write_scalar(bus, memory, value));
    }

    pub fn barrier_load_load(&mut self) {
        tracing::trace!(epoch = self.memory.epoch(), "barrier load-load");
        self.thread(|bus, memory| bus.barrier_load_load(memory));
    }

    pub fn barrier_load_store(&mut self) {
        tracing::trace!(epoch = self.memory.epoch(), "barrier load-store");
        self.thread(|bus, memory| bus.barrier_load_store(memory));
    }

    pub fn barrier_store_load(&mut self) {
        tracing::trace!(epoch = self.memory.epoch(), "barrier store-load");
        self.thread(|bus, memory| bus.barrier_store_load(memory));
    }

    pub fn barrier_store_store(&mut self) {
        tracing::trace!(epoch = self.memory.epoch(), "barrier store-store");
        self.thread(|bus, memory| bus.barrier_store_store(memory));
    }

    #[inline]
    pub fn undefined_bool(&mut self) -> bool {
        self.bus.undefined_bool()
    }

    /// An unconstrained value of type `T`. Callers must not depend on the bits.
    #[inline]
    pub fn undefined<T: UndefinedScalar>(&mut self) -> T {
        T::undefined(self.bus)
    }

    /// A read operand for `addr` relative to `segment`.
    #[inline]
    pub fn read_ptr_seg<T: Element>(&mut self, addr: Addr, segment: Addr) -> MemRead<T> {
        MemRead::new(self.bus.compute_address(addr, segment))
    }

    /// A write operand for `addr` relative to `segment`.
    #[inline]
    pub fn write_ptr_seg<T: Element>(&mut self, addr: Addr, segment: Addr) -> MemWrite<T> {
        MemWrite::new(self.bus.compute_address(addr, segment))
    }

    /// Hands the machine state, the instruction pointer and the current memory token to the
    /// environment's fatal handler. Never returns.
    pub fn stop_failure(self, state: &mut B::State, pc: Addr) -> ! {
        let Self { bus, memory } = self;
        tracing::error!(pc, epoch = memory.epoch(), "semantics reached an invalid state");
        bus.error(state, memory, pc)
    }
}

macro_rules! named_vector_access {
    ($($t:ty => $read:ident, $write:ident, $write_scalar:ident;)*) => {
        impl<B: Intrinsics + ?Sized> Semantics<'_, B> {$(
            #[inline]
            pub fn $read<O: VectorReadable<$t>>(&mut self, op: &O) -> O::Agg {
                self.read_vector::<$t, O>(op)
            }

            #[inline]
            pub fn $write<O: AggregateWritable<Vector<$t, M>>, const M: usize>(
                &mut self,
                op: O,
                value: Vector<$t, M>,
            ) {
                self.write_vector(op, value);
            }

            #[inline]
            pub fn $write_scalar<O: VectorWritable<$t>>(&mut self, op: O, value: $t) {
                self.write_vector_scalar(op, value);
            }
        )*}
    };
}

named_vector_access! {
    u8 => read_v8, write_v8, write_v8_scalar;
    u16 => read_v16, write_v16, write_v16_scalar;
    u32 => read_v32, write_v32, write_v32_scalar;
    u64 => read_v64, write_v64, write_v64_scalar;
    u128 => read_v128, write_v128, write_v128_scalar;
    f32 => read_fv32, write_fv32, write_fv32_scalar;
    f64 => read_fv64, write_fv64, write_fv64_scalar;
}
