use opsem::Addr;
use thiserror::Error;

use crate::state::MachineState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlatBusError {
    #[error("guest memory size must be non-zero")]
    ZeroSize,

    /// The guest memory would extend past the end of the modeled address space.
    #[error("guest memory size 0x{size:x} does not fit the address space")]
    TooLarge { size: usize },

    #[error("guest memory access out of range: addr=0x{addr:x} len={len} size=0x{size:x}")]
    OutOfRange { addr: Addr, len: usize, size: usize },
}

/// Report raised by the fatal-stop intrinsic.
///
/// [`FlatBus`](crate::FlatBus) panics with this value as the payload, so a harness can recover it
/// with [`std::panic::catch_unwind`] and `downcast_ref::<FatalStop>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("semantics stopped at pc=0x{pc:x} (memory epoch {epoch})")]
pub struct FatalStop {
    pub pc: Addr,
    pub epoch: u64,
    /// The machine state as the semantics left it.
    pub state: MachineState,
}
