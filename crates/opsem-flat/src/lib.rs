#![forbid(unsafe_code)]

//! Reference environment for `opsem` semantics.
//!
//! [`FlatBus`] implements the intrinsic surface over a single guest RAM region and
//! [`MachineState`] provides register slots, so semantics functions can be run and inspected
//! without a lifter or a real CPU model.

mod bus;
mod error;
mod log;
mod state;

pub mod ext80;

pub use bus::{FlatBus, FlatBusOptions};
pub use error::{FatalStop, FlatBusError};
pub use log::IntrinsicEvent;
pub use state::{Flags, MachineState, GPR_COUNT, VEC_COUNT};
