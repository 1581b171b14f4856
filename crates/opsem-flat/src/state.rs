use opsem::operand::{RegRead, RegWrite, VecRegRead, VecRegWrite};
use opsem::vector::V128;
use opsem::Addr;

pub const GPR_COUNT: usize = 16;
pub const VEC_COUNT: usize = 16;

/// Arithmetic status flags, one slot each so semantics can write them individually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub cf: bool,
    pub pf: bool,
    pub zf: bool,
    pub sf: bool,
    pub of: bool,
}

/// A small register file for running semantics against [`FlatBus`](crate::FlatBus).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineState {
    pub gpr: [u64; GPR_COUNT],
    pub vec: [V128; VEC_COUNT],
    pub flags: Flags,
    pub pc: Addr,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gpr_read(&self, index: usize) -> RegRead<u64> {
        RegRead(self.gpr[index])
    }

    /// Full-width write slot. Narrower results go through a zero-extending write.
    pub fn gpr_write(&mut self, index: usize) -> RegWrite<'_, u64> {
        RegWrite(&mut self.gpr[index])
    }

    pub fn vec_read(&self, index: usize) -> VecRegRead<V128> {
        VecRegRead(self.vec[index])
    }

    pub fn vec_write(&mut self, index: usize) -> VecRegWrite<'_, V128> {
        VecRegWrite(&mut self.vec[index])
    }

    pub fn advance_pc(&mut self, delta: Addr) {
        self.pc = self.pc.wrapping_add(delta);
    }
}
