#![forbid(unsafe_code)]

//! Operand and memory-effect primitives for writing instruction semantics.
//!
//! A semantics function describes what one instruction does in terms of typed operands (see
//! [`operand`]) and the primitives of a [`Semantics`] context: scalar and vector reads and writes,
//! barriers, undefined values and the fatal stop. The context owns the [`Memory`] token, so memory
//! effects are ordered by construction, and everything that reaches outside the semantics goes
//! through the fixed [`Intrinsics`] surface.
//!
//! Operators and conversions are free functions in [`ops`], [`convert`] and [`vector`]; they never
//! touch the token.

mod dispatch;
mod error;
mod memory;
mod semantics;

pub mod convert;
pub mod intrinsics;
pub mod operand;
pub mod ops;
pub mod scalar;
pub mod vector;

#[cfg(test)]
mod test_bus;

pub use dispatch::{Readable, Writable};
pub use error::VectorError;
pub use intrinsics::{Intrinsic, Intrinsics};
pub use memory::Memory;
pub use semantics::Semantics;

/// Address in the modeled machine; also its natural unsigned word.
#[cfg(not(feature = "address-size-32"))]
pub type Addr = u64;
/// Signed counterpart of [`Addr`].
#[cfg(not(feature = "address-size-32"))]
pub type AddrDiff = i64;

#[cfg(feature = "address-size-32")]
pub type Addr = u32;
#[cfg(feature = "address-size-32")]
pub type AddrDiff = i32;
