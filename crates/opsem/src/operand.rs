//! Operand categories and classification.
//!
//! Each category is its own wrapper type, generic over the element it names. Semantics dispatch on
//! these statically: there is no runtime tag, and every primitive resolves to one concrete
//! implementation per (category, element) pair.

use core::fmt;
use core::marker::PhantomData;

use bitflags::bitflags;

use crate::scalar::Element;
use crate::Addr;

bitflags! {
    /// Static classification of an operand category.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u8 {
        const REGISTER = 1 << 0;
        const MEMORY = 1 << 1;
        const IMMEDIATE = 1 << 2;
        const VECTOR = 1 << 3;
        const WRITE = 1 << 4;
    }
}

/// Implemented by every operand category and by bare scalar values.
pub trait Operand {
    /// The element type the operand names.
    type Elem: Element;
    const CATEGORY: Category;
}

#[inline]
pub const fn is_register<O: Operand + ?Sized>(_op: &O) -> bool {
    O::CATEGORY.contains(Category::REGISTER)
}

#[inline]
pub const fn is_memory<O: Operand + ?Sized>(_op: &O) -> bool {
    O::CATEGORY.contains(Category::MEMORY)
}

#[inline]
pub const fn is_immediate<O: Operand + ?Sized>(_op: &O) -> bool {
    O::CATEGORY.contains(Category::IMMEDIATE)
}

/// A register value captured for reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegRead<T>(pub T);

/// An exclusive borrow of a register slot in the machine state.
///
/// Writing consumes the operand, so the borrow lasts for exactly one primitive call.
#[derive(Debug)]
pub struct RegWrite<'a, T>(pub &'a mut T);

/// An immediate, already extended per the architecture's rules by the decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imm<T>(pub T);

/// A vector register value captured for reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VecRegRead<R>(pub R);

/// An exclusive borrow of vector register storage.
#[derive(Debug)]
pub struct VecRegWrite<'a, R>(pub &'a mut R);

/// Operands that name a location in the address space.
pub trait MemoryOperand {
    fn address(&self) -> Addr;
}

/// The address a memory operand refers to.
#[inline]
pub fn address_of<O: MemoryOperand>(op: &O) -> Addr {
    op.address()
}

macro_rules! memory_operand {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        pub struct $name<T> {
            addr: Addr,
            _elem: PhantomData<fn() -> T>,
        }

        impl<T> $name<T> {
            #[inline]
            pub const fn new(addr: Addr) -> Self {
                Self {
                    addr,
                    _elem: PhantomData,
                }
            }

            #[inline]
            pub const fn addr(&self) -> Addr {
                self.addr
            }
        }

        impl<T> MemoryOperand for $name<T> {
            #[inline]
            fn address(&self) -> Addr {
                self.addr
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.addr == other.addr
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}<{}>({:#x})",
                    stringify!($name),
                    core::any::type_name::<T>(),
                    self.addr
                )
            }
        }
    )*};
}

memory_operand! {
    /// A scalar memory location to read.
    MemRead;
    /// A scalar memory location to read and write.
    MemWrite;
    /// A vector-shaped memory location to read; `R` is the lane storage type giving its shape.
    MemVecRead;
    /// A vector-shaped memory location to write.
    MemVecWrite;
}

macro_rules! element_ptr {
    ($($name:ident),*) => {$(
        impl<T: Element> $name<T> {
            /// The operand `index` elements past this one (byte stride = element width).
            #[inline]
            pub fn element(self, index: Addr) -> Self {
                Self::new(
                    self.addr
                        .wrapping_add(index.wrapping_mul(<T as Element>::BYTES as Addr)),
                )
            }
        }
    )*};
}

element_ptr!(MemRead, MemWrite);

/// A read operand for an already-resolved address.
#[inline]
pub const fn read_ptr<T>(addr: Addr) -> MemRead<T> {
    MemRead::new(addr)
}

/// A write operand for an already-resolved address.
#[inline]
pub const fn write_ptr<T>(addr: Addr) -> MemWrite<T> {
    MemWrite::new(addr)
}

macro_rules! impl_operand {
    ($($ty:ident $(<$lt:lifetime>)? => $cat:expr;)*) => {$(
        impl<$($lt,)? T: Element> Operand for $ty<$($lt,)? T> {
            type Elem = T;
            const CATEGORY: Category = $cat;
        }
    )*};
}

impl_operand! {
    RegRead => Category::REGISTER;
    RegWrite<'a> => Category::REGISTER.union(Category::WRITE);
    Imm => Category::IMMEDIATE;
    MemRead => Category::MEMORY;
    MemWrite => Category::MEMORY.union(Category::WRITE);
    VecRegRead => Category::REGISTER.union(Category::VECTOR);
    VecRegWrite<'a> => Category::REGISTER
        .union(Category::VECTOR)
        .union(Category::WRITE);
    MemVecRead => Category::MEMORY.union(Category::VECTOR);
    MemVecWrite => Category::MEMORY
        .union(Category::VECTOR)
        .union(Category::WRITE);
}

// Bare values mix freely with register operands at call sites, so they classify as registers.
// They also classify as immediates; never as memory.
macro_rules! impl_bare_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            type Elem = $t;
            const CATEGORY: Category = Category::REGISTER.union(Category::IMMEDIATE);
        }
    )*};
}

impl_bare_operand!(bool, u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::V128;

    #[test]
    fn classification_table() {
        let mut slot = 0u32;
        let mut vslot = V128::default();

        assert!(is_register(&RegRead(1u32)));
        assert!(!is_memory(&RegRead(1u32)));
        assert!(!is_immediate(&RegRead(1u32)));

        let write = RegWrite(&mut slot);
        assert!(is_register(&write));
        assert!(!is_memory(&write));
        assert!(!is_immediate(&write));

        assert!(is_memory(&MemRead::<u16>::new(0x10)));
        assert!(is_memory(&MemWrite::<u16>::new(0x10)));
        assert!(!is_register(&MemWrite::<u16>::new(0x10)));

        assert!(is_immediate(&Imm(7u8)));
        assert!(!is_register(&Imm(7u8)));

        assert!(is_register(&VecRegRead(V128::default())));
        assert!(is_register(&VecRegWrite(&mut vslot)));
        assert!(is_memory(&MemVecRead::<V128>::new(0)));
        assert!(is_memory(&MemVecWrite::<V128>::new(0)));
        assert!(!is_immediate(&MemVecWrite::<V128>::new(0)));
    }

    #[test]
    fn bare_scalars_classify_as_registers() {
        assert!(is_register(&5u64));
        assert!(is_immediate(&5u64));
        assert!(!is_memory(&5u64));
        assert!(is_register(&true));
        assert!(is_register(&1.0f32));
    }

    #[test]
    fn element_pointer_strides_by_width() {
        let base = MemRead::<u32>::new(0x1000);
        assert_eq!(base.element(3).addr(), 0x100C);
        assert_eq!(address_of(&MemWrite::<u64>::new(0x20).element(2)), 0x30);
    }
}
