use std::ops::Range;

use opsem::{Addr, Intrinsic, Intrinsics, Memory};

use crate::error::{FatalStop, FlatBusError};
use crate::ext80::{Ext80, EXT80_BYTES};
use crate::log::IntrinsicEvent;
use crate::state::MachineState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatBusOptions {
    /// Guest memory size in bytes, mapped at address 0.
    pub size: usize,
    /// Bit pattern returned by the undefined-value intrinsics, truncated to the requested width.
    /// Boolean requests return its low bit.
    pub undefined_fill: u64,
    /// Keep an [`IntrinsicEvent`] for every intrinsic call.
    pub record_intrinsics: bool,
}

impl Default for FlatBusOptions {
    fn default() -> Self {
        Self {
            size: 1 << 20,
            undefined_fill: 0,
            record_intrinsics: false,
        }
    }
}

/// Intrinsic environment backed by one contiguous guest RAM region starting at address 0.
///
/// Accesses outside the region behave like an open bus, byte by byte: out-of-range bytes read as
/// `0xFF` and out-of-range bytes of a write are dropped, while the in-range bytes of an access that
/// straddles the end of RAM are still read or stored. Memory tokens are checked against the last
/// one this bus issued; a mismatch is logged, never fatal.
#[derive(Debug, Clone)]
pub struct FlatBus {
    mem: Vec<u8>,
    undefined_fill: u64,
    events: Option<Vec<IntrinsicEvent>>,
    epoch: u64,
}

impl FlatBus {
    pub fn new(size: usize) -> Result<Self, FlatBusError> {
        Self::with_options(FlatBusOptions {
            size,
            ..FlatBusOptions::default()
        })
    }

    pub fn with_options(options: FlatBusOptions) -> Result<Self, FlatBusError> {
        if options.size == 0 {
            return Err(FlatBusError::ZeroSize);
        }
        if Addr::try_from(options.size - 1).is_err() {
            return Err(FlatBusError::TooLarge { size: options.size });
        }

        Ok(Self {
            mem: vec![0; options.size],
            undefined_fill: options.undefined_fill,
            events: options.record_intrinsics.then(Vec::new),
            epoch: Memory::initial().epoch(),
        })
    }

    pub fn size(&self) -> usize {
        self.mem.len()
    }

    /// Starts a fresh token chain. Use this instead of [`Memory::initial`] when the bus has already
    /// served earlier invocations whose final token was discarded.
    pub fn begin(&mut self) -> Memory {
        let memory = Memory::initial();
        self.epoch = memory.epoch();
        memory
    }

    /// Epoch of the most recent token this bus handed out.
    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Copies `data` into guest memory without going through the intrinsic surface.
    pub fn load(&mut self, addr: Addr, data: &[u8]) -> Result<(), FlatBusError> {
        let range = self.checked_range(addr, data.len())?;
        self.mem[range].copy_from_slice(data);
        Ok(())
    }

    pub fn slice(&self, addr: Addr, len: usize) -> Result<&[u8], FlatBusError> {
        let range = self.checked_range(addr, len)?;
        Ok(&self.mem[range])
    }

    /// Recorded intrinsic calls, oldest first. Empty unless recording was enabled.
    pub fn events(&self) -> &[IntrinsicEvent] {
        self.events.as_deref().unwrap_or_default()
    }

    pub fn take_events(&mut self) -> Vec<IntrinsicEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn range(&self, addr: Addr, len: usize) -> Option<Range<usize>> {
        let start = usize::try_from(addr).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.mem.len()).then_some(start..end)
    }

    fn checked_range(&self, addr: Addr, len: usize) -> Result<Range<usize>, FlatBusError> {
        self.range(addr, len).ok_or(FlatBusError::OutOfRange {
            addr,
            len,
            size: self.mem.len(),
        })
    }

    fn observe(&mut self, intrinsic: Intrinsic, addr: Option<Addr>, memory: Option<&Memory>) {
        if let Some(memory) = memory {
            if memory.epoch() != self.epoch {
                tracing::warn!(
                    %intrinsic,
                    presented = memory.epoch(),
                    current = self.epoch,
                    "stale memory token"
                );
            }
        }
        if let Some(events) = self.events.as_mut() {
            events.push(IntrinsicEvent {
                intrinsic,
                addr,
                epoch: memory.map(Memory::epoch),
            });
        }
    }

    fn advance(&mut self, memory: Memory) -> Memory {
        let next = memory.advance();
        self.epoch = next.epoch();
        tracing::trace!(epoch = self.epoch, "memory token advanced");
        next
    }

    fn read_bytes<const N: usize>(
        &mut self,
        intrinsic: Intrinsic,
        memory: &Memory,
        addr: Addr,
    ) -> [u8; N] {
        self.observe(intrinsic, Some(addr), Some(memory));
        if let Some(range) = self.range(addr, N) {
            let mut out = [0u8; N];
            out.copy_from_slice(&self.mem[range]);
            return out;
        }

        tracing::warn!(addr, len = N, size = self.mem.len(), "open-bus read");
        let mut out = [0xFFu8; N];
        for (i, byte) in out.iter_mut().enumerate() {
            if let Some(range) = self.range(addr.wrapping_add(i as Addr), 1) {
                *byte = self.mem[range.start];
            }
        }
        out
    }

    fn write_bytes(
        &mut self,
        intrinsic: Intrinsic,
        memory: Memory,
        addr: Addr,
        bytes: &[u8],
    ) -> Memory {
        self.observe(intrinsic, Some(addr), Some(&memory));
        if let Some(range) = self.range(addr, bytes.len()) {
            self.mem[range].copy_from_slice(bytes);
        } else {
            tracing::warn!(
                addr,
                len = bytes.len(),
                size = self.mem.len(),
                "open-bus write, out-of-range bytes dropped"
            );
            for (i, &byte) in bytes.iter().enumerate() {
                if let Some(range) = self.range(addr.wrapping_add(i as Addr), 1) {
                    self.mem[range.start] = byte;
                }
            }
        }
        self.advance(memory)
    }

    fn barrier(&mut self, intrinsic: Intrinsic, memory: Memory) -> Memory {
        self.observe(intrinsic, None, Some(&memory));
        self.advance(memory)
    }

    fn undefined(&mut self, intrinsic: Intrinsic) -> u64 {
        self.observe(intrinsic, None, None);
        self.undefined_fill
    }
}

impl Intrinsics for FlatBus {
    type State = MachineState;

    fn read_memory_8(&mut self, memory: &Memory, addr: Addr) -> u8 {
        u8::from_le_bytes(self.read_bytes(Intrinsic::ReadMemory8, memory, addr))
    }

    fn read_memory_16(&mut self, memory: &Memory, addr: Addr) -> u16 {
        u16::from_le_bytes(self.read_bytes(Intrinsic::ReadMemory16, memory, addr))
    }

    fn read_memory_32(&mut self, memory: &Memory, addr: Addr) -> u32 {
        u32::from_le_bytes(self.read_bytes(Intrinsic::ReadMemory32, memory, addr))
    }

    fn read_memory_64(&mut self, memory: &Memory, addr: Addr) -> u64 {
        u64::from_le_bytes(self.read_bytes(Intrinsic::ReadMemory64, memory, addr))
    }

    fn read_memory_f32(&mut self, memory: &Memory, addr: Addr) -> f32 {
        f32::from_le_bytes(self.read_bytes(Intrinsic::ReadMemoryF32, memory, addr))
    }

    fn read_memory_f64(&mut self, memory: &Memory, addr: Addr) -> f64 {
        f64::from_le_bytes(self.read_bytes(Intrinsic::ReadMemoryF64, memory, addr))
    }

    fn read_memory_f80(&mut self, memory: &Memory, addr: Addr) -> f64 {
        let bytes: [u8; EXT80_BYTES] = self.read_bytes(Intrinsic::ReadMemoryF80, memory, addr);
        Ext80::from_le_bytes(bytes).to_f64()
    }

    fn write_memory_8(&mut self, memory: Memory, addr: Addr, val: u8) -> Memory {
        self.write_bytes(Intrinsic::WriteMemory8, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_16(&mut self, memory: Memory, addr: Addr, val: u16) -> Memory {
        self.write_bytes(Intrinsic::WriteMemory16, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_32(&mut self, memory: Memory, addr: Addr, val: u32) -> Memory {
        self.write_bytes(Intrinsic::WriteMemory32, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_64(&mut self, memory: Memory, addr: Addr, val: u64) -> Memory {
        self.write_bytes(Intrinsic::WriteMemory64, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f32(&mut self, memory: Memory, addr: Addr, val: f32) -> Memory {
        self.write_bytes(Intrinsic::WriteMemoryF32, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f64(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory {
        self.write_bytes(Intrinsic::WriteMemoryF64, memory, addr, &val.to_le_bytes())
    }

    fn write_memory_f80(&mut self, memory: Memory, addr: Addr, val: f64) -> Memory {
        let bytes = Ext80::from_f64(val).to_le_bytes();
        self.write_bytes(Intrinsic::WriteMemoryF80, memory, addr, &bytes)
    }

    fn barrier_load_load(&mut self, memory: Memory) -> Memory {
        self.barrier(Intrinsic::BarrierLoadLoad, memory)
    }

    fn barrier_load_store(&mut self, memory: Memory) -> Memory {
        self.barrier(Intrinsic::BarrierLoadStore, memory)
    }

    fn barrier_store_load(&mut self, memory: Memory) -> Memory {
        self.barrier(Intrinsic::BarrierStoreLoad, memory)
    }

    fn barrier_store_store(&mut self, memory: Memory) -> Memory {
        self.barrier(Intrinsic::BarrierStoreStore, memory)
    }

    fn compute_address(&mut self, addr: Addr, segment: Addr) -> Addr {
        let resolved = segment.wrapping_add(addr);
        self.observe(Intrinsic::ComputeAddress, Some(resolved), None);
        resolved
    }

    fn undefined_bool(&mut self) -> bool {
        self.undefined(Intrinsic::UndefinedBool) & 1 != 0
    }

    fn undefined_8(&mut self) -> u8 {
        self.undefined(Intrinsic::Undefined8) as u8
    }

    fn undefined_16(&mut self) -> u16 {
        self.undefined(Intrinsic::Undefined16) as u16
    }

    fn undefined_32(&mut self) -> u32 {
        self.undefined(Intrinsic::Undefined32) as u32
    }

    fn undefined_64(&mut self) -> u64 {
        self.undefined(Intrinsic::Undefined64)
    }

    fn error(&mut self, state: &mut MachineState, memory: Memory, pc: Addr) -> ! {
        self.observe(Intrinsic::Error, Some(pc), Some(&memory));
        let stop = FatalStop {
            pc,
            epoch: memory.epoch(),
            state: state.clone(),
        };
        tracing::error!(pc, epoch = stop.epoch, "fatal stop");
        std::panic::panic_any(stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_validated() {
        assert_eq!(FlatBus::new(0).unwrap_err(), FlatBusError::ZeroSize);
        assert!(FlatBus::new(16).is_ok());
        #[cfg(feature = "address-size-32")]
        assert_eq!(
            FlatBus::new((u32::MAX as usize) + 2).unwrap_err(),
            FlatBusError::TooLarge {
                size: (u32::MAX as usize) + 2
            }
        );
    }

    #[test]
    fn little_endian_accesses() {
        let mut bus = FlatBus::new(16).unwrap();
        let memory = bus.begin();
        let memory = bus.write_memory_32(memory, 4, 0x1122_3344);
        assert_eq!(bus.slice(4, 4).unwrap(), &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(bus.read_memory_16(&memory, 5), 0x2233);
        assert_eq!(memory.epoch(), 1);
    }

    #[test]
    fn open_bus_is_per_byte() {
        let mut bus = FlatBus::new(8).unwrap();
        bus.load(0, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let memory = bus.begin();
        assert_eq!(bus.read_memory_32(&memory, 6), 0xFFFF_0807);
        assert_eq!(bus.read_memory_8(&memory, 100), 0xFF);

        // The two in-range bytes of a straddling store land; the rest are dropped.
        let memory = bus.write_memory_32(memory, 6, 0xAABB_CCDD);
        assert_eq!(bus.slice(6, 2).unwrap(), &[0xDD, 0xCC]);
        assert_eq!(bus.read_memory_32(&memory, 6), 0xFFFF_CCDD);
        let memory = bus.write_memory_64(memory, 0x100, u64::MAX);
        assert_eq!(memory.epoch(), 2);
        assert_eq!(bus.slice(0, 6).unwrap(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn out_of_range_helpers_report_errors() {
        let mut bus = FlatBus::new(4).unwrap();
        assert_eq!(
            bus.load(2, &[0; 4]),
            Err(FlatBusError::OutOfRange {
                addr: 2,
                len: 4,
                size: 4
            })
        );
        assert!(bus.slice(0, 5).is_err());
    }

    #[test]
    fn extended_floats_use_ten_bytes() {
        let mut bus = FlatBus::new(32).unwrap();
        bus.load(0, &[0xEE; 32]).unwrap();
        let memory = bus.begin();
        let memory = bus.write_memory_f80(memory, 4, -2.0);
        assert_eq!(
            bus.slice(4, 10).unwrap(),
            &[0, 0, 0, 0, 0, 0, 0, 0x80, 0x00, 0xC0]
        );
        assert_eq!(bus.slice(14, 1).unwrap(), &[0xEE]);
        assert_eq!(bus.read_memory_f80(&memory, 4), -2.0);
    }

    #[test]
    fn undefined_values_follow_the_fill_pattern() {
        let mut bus = FlatBus::with_options(FlatBusOptions {
            size: 1,
            undefined_fill: 0x0123_4567_89AB_CDEF,
            record_intrinsics: false,
        })
        .unwrap();
        assert!(bus.undefined_bool());
        assert_eq!(bus.undefined_8(), 0xEF);
        assert_eq!(bus.undefined_16(), 0xCDEF);
        assert_eq!(bus.undefined_32(), 0x89AB_CDEF);
        assert_eq!(bus.undefined_64(), 0x0123_4567_89AB_CDEF);
        assert_eq!(bus.undefined_32(), 0x89AB_CDEF);
    }

    #[test]
    fn events_record_token_epochs() {
        let mut bus = FlatBus::with_options(FlatBusOptions {
            size: 16,
            record_intrinsics: true,
            ..FlatBusOptions::default()
        })
        .unwrap();
        let memory = bus.begin();
        let memory = bus.write_memory_8(memory, 1, 7);
        let memory = bus.barrier_store_load(memory);
        let _ = bus.read_memory_8(&memory, 1);
        let _ = bus.compute_address(0x10, 0x100);

        let events = bus.take_events();
        let summary: Vec<_> = events
            .iter()
            .map(|e| (e.intrinsic, e.addr, e.epoch))
            .collect();
        assert_eq!(
            summary,
            [
                (Intrinsic::WriteMemory8, Some(1), Some(0)),
                (Intrinsic::BarrierStoreLoad, None, Some(1)),
                (Intrinsic::ReadMemory8, Some(1), Some(2)),
                (Intrinsic::ComputeAddress, Some(0x110), None),
            ]
        );
        assert!(bus.events().is_empty());
    }

    #[test]
    fn recording_is_off_by_default() {
        let mut bus = FlatBus::new(4).unwrap();
        let memory = bus.begin();
        let _ = bus.write_memory_8(memory, 0, 1);
        assert!(bus.events().is_empty());
    }
}
