//! The memory-effect token.

/// Memory state as of one program point of a semantics invocation.
///
/// Every memory read borrows the current token; every memory write and every barrier consumes it
/// and hands back its successor. The type is neither `Clone` nor `Copy`, so once an operation has
/// consumed a token nothing can present it again: effects are totally ordered by construction.
///
/// The epoch is the token's identity. It carries no value and exists so that environments and
/// tests can observe that an operation produced a new token.
#[must_use = "the memory token must be threaded into the next memory operation"]
#[derive(Debug, PartialEq, Eq)]
pub struct Memory {
    epoch: u64,
}

impl Memory {
    /// The token a semantics invocation starts from.
    pub const fn initial() -> Self {
        Self { epoch: 0 }
    }

    #[inline]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Supersede this token. Environments call this to produce the token returned from a write or
    /// barrier intrinsic.
    #[inline]
    pub fn advance(self) -> Self {
        Self {
            epoch: self.epoch.wrapping_add(1),
        }
    }

    /// Placeholder left behind while the real token is out on loan to an intrinsic.
    #[inline]
    pub(crate) const fn vacant() -> Self {
        Self { epoch: u64::MAX }
    }
}
