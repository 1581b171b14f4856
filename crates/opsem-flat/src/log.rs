use core::fmt;

use opsem::{Addr, Intrinsic};

/// One call into the intrinsic surface, as seen by [`FlatBus`](crate::FlatBus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicEvent {
    pub intrinsic: Intrinsic,
    /// Guest address for memory accesses and the instruction pointer for the fatal stop.
    pub addr: Option<Addr>,
    /// Epoch of the memory token presented with the call, if the intrinsic takes one.
    pub epoch: Option<u64>,
}

impl fmt::Display for IntrinsicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.intrinsic.symbol())?;
        if let Some(addr) = self.addr {
            write!(f, " @0x{addr:x}")?;
        }
        if let Some(epoch) = self.epoch {
            write!(f, " [epoch {epoch}]")?;
        }
        Ok(())
    }
}
