//! The fixed intrinsic surface.
//!
//! Semantics built from this crate compile to straight-line code whose only unresolved calls are
//! the methods of [`Intrinsics`]. Downstream tooling recognizes them by the symbol names listed in
//! [`Intrinsic`]; neither set may grow or be renamed.

use core::fmt;

use crate::memory::Memory;
use crate::scalar::{Element, F80};
use crate::Addr;

/// The environment a semantics invocation runs against.
///
/// Reads borrow the current memory token; writes and barriers consume it and must return its
/// successor (normally `memory.advance()`).
pub trait Intrinsics {
    /// The machine state semantics run against, handed to [`Intrinsics::error`].
    type State: ?Sized;

    fn read_memory_8(&mut self, memory: &Memory, addr: Addr) -> u8;
    fn read_memory_16(&mut self, memory: &Memory, addr: Addr) -> u16;
    fn read_memory_32(&mut self, memory: &Memory, addr: Addr) -> u32;
    fn read_memory_64(&mut self, memory: &Memory, addr: Addr) -> u64;
    fn read_memory_f32(&mut self, memory: &Memory, addr: Addr) -> f32;
    fn read_memory_f64(&mut self, memory: &Memory, addr: Addr) -> f64;
    /// Loads an 80-bit extended float, rounded to `f64`.
    fn read_memory_f80(&mut self, memory: &Memory, addr: Addr) -> f64;

    fn write_memory_8(&mut self, memory: Memory, addr: Addr, val: u8) -> Memory;
    fn write_memory_16(&mut self, memory: Memory, addr: Addr, val: u16) -> Memory;
    fn write_memory_32(&mut self, memory: Memory, addr: Addr, val: u32) -> Memory;
    fn write_memory_64(&mut self, memory: Memory, addr: Addr, val: u64) -> Memory;
    fn write_memory_f32(&mut self, memory: Memory, addr: Addr, val: f32) -> Memory;
    fn write_memory_f64(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory;
    /// Stores an `f64` as an 80-bit extended float.
    fn write_memory_f80(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory;

    fn barrier_load_load(&mut self, memory: Memory) -> Memory;
    fn barrier_load_store(&mut self, memory: Memory) -> Memory;
    fn barrier_store_load(&mut self, memory: Memory) -> Memory;
    fn barrier_store_store(&mut self, memory: Memory) -> Memory;

    /// Resolve `addr` relative to a segment base.
    fn compute_address(&mut self, addr: Addr, segment: Addr) -> Addr;

    fn undefined_bool(&mut self) -> bool;
    fn undefined_8(&mut self) -> u8;
    fn undefined_16(&mut self) -> u16;
    fn undefined_32(&mut self) -> u32;
    fn undefined_64(&mut self) -> u64;

    /// Report an architecturally invalid state. Never returns.
    fn error(&mut self, state: &mut Self::State, memory: Memory, pc: Addr) -> !;
}

macro_rules! intrinsic_catalogue {
    ($($variant:ident => $symbol:literal,)*) => {
        /// One entry of the fixed intrinsic surface.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Intrinsic {
            $($variant,)*
        }

        impl Intrinsic {
            pub const ALL: &'static [Intrinsic] = &[$(Intrinsic::$variant,)*];

            /// The symbol downstream tooling matches on.
            pub const fn symbol(self) -> &'static str {
                match self {
                    $(Intrinsic::$variant => $symbol,)*
                }
            }
        }
    };
}

intrinsic_catalogue! {
    ReadMemory8 => "__opsem_read_memory_8",
    ReadMemory16 => "__opsem_read_memory_16",
    ReadMemory32 => "__opsem_read_memory_32",
    ReadMemory64 => "__opsem_read_memory_64",
    ReadMemoryF32 => "__opsem_read_memory_f32",
    ReadMemoryF64 => "__opsem_read_memory_f64",
    ReadMemoryF80 => "__opsem_read_memory_f80",
    WriteMemory8 => "__opsem_write_memory_8",
    WriteMemory16 => "__opsem_write_memory_16",
    WriteMemory32 => "__opsem_write_memory_32",
    WriteMemory64 => "__opsem_write_memory_64",
    WriteMemoryF32 => "__opsem_write_memory_f32",
    WriteMemoryF64 => "__opsem_write_memory_f64",
    WriteMemoryF80 => "__opsem_write_memory_f80",
    BarrierLoadLoad => "__opsem_barrier_load_load",
    BarrierLoadStore => "__opsem_barrier_load_store",
    BarrierStoreLoad => "__opsem_barrier_store_load",
    BarrierStoreStore => "__opsem_barrier_store_store",
    ComputeAddress => "__opsem_compute_address",
    UndefinedBool => "__opsem_undefined_bool",
    Undefined8 => "__opsem_undefined_8",
    Undefined16 => "__opsem_undefined_16",
    Undefined32 => "__opsem_undefined_32",
    Undefined64 => "__opsem_undefined_64",
    Error => "__opsem_error",
}

impl Intrinsic {
    pub const fn is_memory_write(self) -> bool {
        matches!(
            self,
            Intrinsic::WriteMemory8
                | Intrinsic::WriteMemory16
                | Intrinsic::WriteMemory32
                | Intrinsic::WriteMemory64
                | Intrinsic::WriteMemoryF32
                | Intrinsic::WriteMemoryF64
                | Intrinsic::WriteMemoryF80
        )
    }

    pub const fn is_barrier(self) -> bool {
        matches!(
            self,
            Intrinsic::BarrierLoadLoad
                | Intrinsic::BarrierLoadStore
                | Intrinsic::BarrierStoreLoad
                | Intrinsic::BarrierStoreStore
        )
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Element types with a memory representation reachable through the intrinsic surface.
pub trait MemoryScalar: Element {
    /// The value a load produces and a store takes.
    type Value: Copy;

    fn load<B: Intrinsics + ?Sized>(bus: &mut B, memory: &Memory, addr: Addr) -> Self::Value;
    fn store<B: Intrinsics + ?Sized>(
        bus: &mut B,
        memory: Memory,
        addr: Addr,
        value: Self::Value,
    ) -> Memory;
}

macro_rules! impl_memory_scalar {
    ($($t:ty => $value:ty, $read:ident, $write:ident;)*) => {$(
        impl MemoryScalar for $t {
            type Value = $value;

            #[inline]
            fn load<B: Intrinsics + ?Sized>(bus: &mut B, memory: &Memory, addr: Addr) -> $value {
                bus.$read(memory, addr)
            }

            #[inline]
            fn store<B: Intrinsics + ?Sized>(
                bus: &mut B,
                memory: Memory,
                addr: Addr,
                value: $value,
            ) -> Memory {
                bus.$write(memory, addr, value)
            }
        }
    )*};
}

impl_memory_scalar! {
    u8 => u8, read_memory_8, write_memory_8;
    u16 => u16, read_memory_16, write_memory_16;
    u32 => u32, read_memory_32, write_memory_32;
    u64 => u64, read_memory_64, write_memory_64;
    f32 => f32, read_memory_f32, write_memory_f32;
    f64 => f64, read_memory_f64, write_memory_f64;
    F80 => f64, read_memory_f80, write_memory_f80;
}

// 128-bit elements go through two 64-bit accesses, low half first.
impl MemoryScalar for u128 {
    type Value = u128;

    #[inline]
    fn load<B: Intrinsics + ?Sized>(bus: &mut B, memory: &Memory, addr: Addr) -> u128 {
        let lo = bus.read_memory_64(memory, addr);
        let hi = bus.read_memory_64(memory, addr.wrapping_add(8));
        (u128::from(hi) << 64) | u128::from(lo)
    }

    #[inline]
    fn store<B: Intrinsics + ?Sized>(
        bus: &mut B,
        memory: Memory,
        addr: Addr,
        value: u128,
    ) -> Memory {
        let memory = bus.write_memory_64(memory, addr, value as u64);
        bus.write_memory_64(memory, addr.wrapping_add(8), (value >> 64) as u64)
    }
}

/// Integer widths the undefined-value intrinsics cover.
pub trait UndefinedScalar: Element + Copy {
    fn undefined<B: Intrinsics + ?Sized>(bus: &mut B) -> Self;
}

macro_rules! impl_undefined {
    ($($t:ty => $intrinsic:ident;)*) => {$(
        impl UndefinedScalar for $t {
            #[inline]
            fn undefined<B: Intrinsics + ?Sized>(bus: &mut B) -> Self {
                bus.$intrinsic()
            }
        }
    )*};
}

impl_undefined! {
    bool => undefined_bool;
    u8 => undefined_8;
    u16 => undefined_16;
    u32 => undefined_32;
    u64 => undefined_64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_symbols_are_unique_and_prefixed() {
        let symbols: HashSet<_> = Intrinsic::ALL.iter().map(|i| i.symbol()).collect();
        assert_eq!(symbols.len(), Intrinsic::ALL.len());
        assert_eq!(Intrinsic::ALL.len(), 25);
        assert!(symbols.iter().all(|s| s.starts_with("__opsem_")));
    }

    #[test]
    fn catalogue_classification() {
        let writes = Intrinsic::ALL.iter().filter(|i| i.is_memory_write()).count();
        let barriers = Intrinsic::ALL.iter().filter(|i| i.is_barrier()).count();
        assert_eq!(writes, 7);
        assert_eq!(barriers, 4);
        assert_eq!(Intrinsic::Error.to_string(), "__opsem_error");
    }
}
