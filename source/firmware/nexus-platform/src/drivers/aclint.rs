// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! ACLINT machine software interrupt (MSWI) and machine timer (MTIMER) devices.
//!
//! A legacy CLINT is one 64 KiB window holding an MSWI block at offset 0 and an
//! MTIMER block at offset 0x4000; [`clint_notifier`] and [`clint_timer`] build
//! handles for that layout.

use static_assertions::const_assert;

use super::{CoreRange, NotifierDriver, NotifierHandle, TimerDriver, TimerHandle};
use crate::error::{Device, PlatformError, Result};
use crate::mmio::Mmio;
use crate::types::CoreId;

pub const MSWI_ALIGN: usize = 0x1000;
pub const MSWI_SIZE: usize = 0x4000;
/// Highest core count one MSWI block can address.
pub const MSWI_MAX_CORES: usize = 4095;

pub const MTIMER_ALIGN: usize = 0x8;
pub const MTIMER_SIZE: usize = 0x8000;
pub const MTIMER_MAX_CORES: usize = 4095;
/// Offset of `mtime` from the MTIMER block base.
pub const MTIME_OFFSET: usize = 0x7ff8;

pub const CLINT_MSWI_OFFSET: usize = 0x0;
pub const CLINT_MTIMER_OFFSET: usize = 0x4000;
pub const CLINT_SIZE: usize = 0x1_0000;

const_assert!(CLINT_MTIMER_OFFSET >= CLINT_MSWI_OFFSET + 4 * MSWI_MAX_CORES);
const_assert!(CLINT_MTIMER_OFFSET + MTIMER_SIZE <= CLINT_SIZE);

/// Parked compare value; never reached by a running counter.
pub const COMPARE_PARKED: u64 = u64::MAX;

/// Notifier handle for the MSWI half of a CLINT at `base`.
pub const fn clint_notifier(base: usize, cores: CoreRange) -> NotifierHandle {
    NotifierHandle::new(base + CLINT_MSWI_OFFSET, MSWI_SIZE, cores)
}

/// Timer handle for the MTIMER half of a CLINT at `base`.
pub const fn clint_timer(
    base: usize,
    frequency: u64,
    cores: CoreRange,
    has_64bit_mmio: bool,
) -> TimerHandle {
    let mtimer = base + CLINT_MTIMER_OFFSET;
    TimerHandle {
        frequency,
        mtime_addr: mtimer + MTIME_OFFSET,
        mtime_size: 8,
        mtimecmp_addr: mtimer,
        mtimecmp_size: MTIME_OFFSET,
        cores,
        has_64bit_mmio,
    }
}

/// MSWI driver: one 32-bit MSIP word per core, bit 0 is the pending flag.
#[derive(Clone, Copy)]
pub struct Mswi<B> {
    bus: B,
}

impl<B: Mmio> Mswi<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    fn msip_addr(handle: &NotifierHandle, slot: usize) -> usize {
        handle.base + 4 * slot
    }

    fn slot(handle: &NotifierHandle, core: CoreId) -> Option<usize> {
        handle.cores.slot(core)
    }
}

impl<B: Mmio> NotifierDriver for Mswi<B> {
    fn cold_init(&self, handle: &NotifierHandle) -> Result<()> {
        let device = Device::Notifier;
        if handle.base == 0 || handle.base % MSWI_ALIGN != 0 {
            return Err(PlatformError::Config { device, reason: "base not 4 KiB aligned" });
        }
        if handle.cores.count == 0 || handle.cores.count > MSWI_MAX_CORES {
            return Err(PlatformError::Config { device, reason: "core count out of range" });
        }
        if handle.size < 4 * handle.cores.count {
            return Err(PlatformError::Config { device, reason: "extent smaller than core count" });
        }
        for slot in 0..handle.cores.count {
            self.bus.write32(Self::msip_addr(handle, slot), 0);
        }
        Ok(())
    }

    fn warm_init(&self, handle: &NotifierHandle, core: CoreId) -> Result<()> {
        let slot = handle.cores.check(Device::Notifier, core)?;
        self.bus.write32(Self::msip_addr(handle, slot), 0);
        Ok(())
    }

    fn send(&self, handle: &NotifierHandle, core: CoreId) {
        if let Some(slot) = Self::slot(handle, core) {
            self.bus.write32(Self::msip_addr(handle, slot), 1);
        }
    }

    fn clear(&self, handle: &NotifierHandle, core: CoreId) {
        if let Some(slot) = Self::slot(handle, core) {
            self.bus.write32(Self::msip_addr(handle, slot), 0);
        }
    }

    fn pending(&self, handle: &NotifierHandle, core: CoreId) -> bool {
        match Self::slot(handle, core) {
            Some(slot) => self.bus.read32(Self::msip_addr(handle, slot)) & 1 != 0,
            None => false,
        }
    }
}

/// MTIMER driver: one shared `mtime` counter and a 64-bit compare per core.
#[derive(Clone, Copy)]
pub struct Mtimer<B> {
    bus: B,
}

impl<B: Mmio> Mtimer<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    fn compare_addr(handle: &TimerHandle, slot: usize) -> usize {
        handle.mtimecmp_addr + 8 * slot
    }

    fn write_compare(&self, handle: &TimerHandle, slot: usize, value: u64) {
        let addr = Self::compare_addr(handle, slot);
        if handle.has_64bit_mmio {
            self.bus.write64(addr, value);
        } else {
            // Keep the low half parked while the high half changes so no
            // intermediate value can fire early.
            self.bus.write32(addr, u32::MAX);
            self.bus.write32(addr + 4, (value >> 32) as u32);
            self.bus.write32(addr, value as u32);
        }
    }

    fn read_compare(&self, handle: &TimerHandle, slot: usize) -> u64 {
        let addr = Self::compare_addr(handle, slot);
        if handle.has_64bit_mmio {
            return self.bus.read64(addr);
        }
        let lo = self.bus.read32(addr) as u64;
        let hi = self.bus.read32(addr + 4) as u64;
        (hi << 32) | lo
    }

    fn read_counter(&self, handle: &TimerHandle) -> u64 {
        if handle.has_64bit_mmio {
            return self.bus.read64(handle.mtime_addr);
        }
        loop {
            let hi = self.bus.read32(handle.mtime_addr + 4);
            let lo = self.bus.read32(handle.mtime_addr);
            if self.bus.read32(handle.mtime_addr + 4) == hi {
                return ((hi as u64) << 32) | lo as u64;
            }
        }
    }
}

impl<B: Mmio> TimerDriver for Mtimer<B> {
    fn cold_init(&self, handle: &TimerHandle) -> Result<()> {
        let device = Device::Timer;
        if handle.frequency == 0 {
            return Err(PlatformError::Config { device, reason: "zero timer frequency" });
        }
        if handle.mtimecmp_addr == 0 || handle.mtimecmp_addr % MTIMER_ALIGN != 0 {
            return Err(PlatformError::Config { device, reason: "compare block misaligned" });
        }
        if handle.mtime_addr == 0 || handle.mtime_addr % MTIMER_ALIGN != 0 {
            return Err(PlatformError::Config { device, reason: "counter misaligned" });
        }
        if handle.mtime_size < 8 {
            return Err(PlatformError::Config { device, reason: "counter extent too small" });
        }
        if handle.cores.count == 0 || handle.cores.count > MTIMER_MAX_CORES {
            return Err(PlatformError::Config { device, reason: "core count out of range" });
        }
        if handle.mtimecmp_size < 8 * handle.cores.count {
            return Err(PlatformError::Config { device, reason: "compare extent smaller than core count" });
        }
        for slot in 0..handle.cores.count {
            self.write_compare(handle, slot, COMPARE_PARKED);
        }
        Ok(())
    }

    fn warm_init(&self, handle: &TimerHandle, core: CoreId) -> Result<()> {
        let slot = handle.cores.check(Device::Timer, core)?;
        self.write_compare(handle, slot, COMPARE_PARKED);
        Ok(())
    }

    fn now(&self, handle: &TimerHandle) -> u64 {
        self.read_counter(handle)
    }

    fn set_compare(&self, handle: &TimerHandle, core: CoreId, value: u64) {
        if let Some(slot) = handle.cores.slot(core) {
            self.write_compare(handle, slot, value);
        }
    }

    fn compare(&self, handle: &TimerHandle, core: CoreId) -> u64 {
        match handle.cores.slot(core) {
            Some(slot) => self.read_compare(handle, slot),
            None => COMPARE_PARKED,
        }
    }
}
