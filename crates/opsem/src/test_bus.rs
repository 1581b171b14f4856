//! Identity-mapped intrinsic environment used by unit tests.

use crate::intrinsics::Intrinsics;
use crate::memory::Memory;
use crate::Addr;

#[derive(Debug, Clone)]
pub(crate) struct TestBus {
    pub mem: Vec<u8>,
    /// Addresses of every memory store, in issue order.
    pub stores: Vec<Addr>,
    pub barriers: usize,
}

impl TestBus {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            stores: Vec::new(),
            barriers: 0,
        }
    }

    fn load<const N: usize>(&self, addr: Addr) -> [u8; N] {
        let start = addr as usize;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.mem[start..start + N]);
        out
    }

    fn store(&mut self, memory: Memory, addr: Addr, bytes: &[u8]) -> Memory {
        let start = addr as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
        self.stores.push(addr);
        memory.advance()
    }
}

impl Intrinsics for TestBus {
    /// A single register is enough to check what reaches the fatal handler.
    type State = u64;

    fn read_memory_8(&mut self, _: &Memory, addr: Addr) -> u8 {
        u8::from_le_bytes(self.load(addr))
    }

    fn read_memory_16(&mut self, _: &Memory, addr: Addr) -> u16 {
        u16::from_le_bytes(self.load(addr))
    }

    fn read_memory_32(&mut self, _: &Memory, addr: Addr) -> u32 {
        u32::from_le_bytes(self.load(addr))
    }

    fn read_memory_64(&mut self, _: &Memory, addr: Addr) -> u64 {
        u64::from_le_bytes(self.load(addr))
    }

    fn read_memory_f32(&mut self, _: &Memory, addr: Addr) -> f32 {
        f32::from_le_bytes(self.load(addr))
    }

    fn read_memory_f64(&mut self, _: &Memory, addr: Addr) -> f64 {
        f64::from_le_bytes(self.load(addr))
    }

    // Extended values are kept in `f64` layout here; the flat environment does the real encoding.
    fn read_memory_f80(&mut self, _: &Memory, addr: Addr) -> f64 {
        f64::from_le_bytes(self.load(addr))
    }

    fn write_memory_8(&mut self, memory: Memory, addr: Addr, val: u8) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_16(&mut self, memory: Memory, addr: Addr, val: u16) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_32(&mut self, memory: Memory, addr: Addr, val: u32) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_64(&mut self, memory: Memory, addr: Addr, val: u64) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f32(&mut self, memory: Memory, addr: Addr, val: f32) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f64(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f80(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory {
        self.store(memory, addr, &val.to_le_bytes())
    }

    fn barrier_load_load(&mut self, memory: Memory) -> Memory {
        self.barriers += 1;
        memory.advance()
    }

    fn barrier_load_store(&mut self, memory: Memory) -> Memory {
        self.barriers += 1;
        memory.advance()
    }

    fn barrier_store_load(&mut self, memory: Memory) -> Memory {
        self.barriers += 1;
        memory.advance()
    }

    fn barrier_store_store(&mut self, memory: Memory) -> Memory {
        self.barriers += 1;
        memory.advance()
    }

    fn compute_address(&mut self, addr: Addr, segment: Addr) -> Addr {
        segment.wrapping_add(addr)
    }

    fn undefined_bool(&mut self) -> bool {
        false
    }

    fn undefined_8(&mut self) -> u8 {
        0xCC
    }

    fn undefined_16(&mut self) -> u16 {
        0xCCCC
    }

    fn undefined_32(&mut self) -> u32 {
        0xCCCC_CCCC
    }

    fn undefined_64(&mut self) -> u64 {
        0xCCCC_CCCC_CCCC_CCCC
    }

    fn error(&mut self, state: &mut u64, memory: Memory, pc: Addr) -> ! {
        panic!(
            "stopped at pc={pc:#x} epoch={} state={state:#x}",
            memory.epoch()
        )
    }
}
