// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Device driver contracts and device handles
//! OWNERS: @firmware-team
//! PUBLIC API: IrqRouterDriver, NotifierDriver, TimerDriver, ConsoleDriver, *Handle
//! DEPENDS_ON: mmio::Mmio (concrete drivers)
//! INVARIANTS: Handles are immutable after construction; only device state mutates
//!
//! Adapters own one handle and one driver each and hand the handle to the
//! driver by reference on every call.

pub mod aclint;
pub mod htif;
pub mod plic;
pub mod uart8250;
pub mod zynq_uart;

use crate::error::{Device, PlatformError, Result};
use crate::types::{CoreId, InterruptContext};

/// Shared interrupt router (PLIC) description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterHandle {
    pub base: usize,
    pub size: usize,
    pub num_sources: u32,
    /// Highest priority a source can carry; a threshold at this value blocks all sources.
    pub max_priority: u32,
    /// Two contexts (M, S) per participating core.
    pub context_count: usize,
}

impl RouterHandle {
    pub const fn new(
        base: usize,
        size: usize,
        num_sources: u32,
        max_priority: u32,
        core_count: usize,
    ) -> Self {
        Self { base, size, num_sources, max_priority, context_count: 2 * core_count }
    }

    /// Number of 32-bit enable words covering every source.
    pub const fn enable_words(&self) -> usize {
        self.num_sources as usize / 32 + 1
    }

    pub fn validate(&self) -> Result<()> {
        let device = Device::IrqRouter;
        if self.base == 0 {
            return Err(PlatformError::Config { device, reason: "zero base address" });
        }
        if self.size == 0 {
            return Err(PlatformError::Config { device, reason: "zero extent" });
        }
        if self.num_sources == 0 {
            return Err(PlatformError::Config { device, reason: "no interrupt sources" });
        }
        if self.context_count == 0 {
            return Err(PlatformError::Config { device, reason: "no contexts" });
        }
        Ok(())
    }

    pub fn check_context(&self, context: usize) -> Result<()> {
        if context < self.context_count {
            Ok(())
        } else {
            Err(PlatformError::Context {
                device: Device::IrqRouter,
                index: context,
                limit: self.context_count,
            })
        }
    }
}

/// Range of consecutive cores served by one notifier or timer device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreRange {
    pub first: usize,
    pub count: usize,
}

impl CoreRange {
    pub const fn new(first: usize, count: usize) -> Self {
        Self { first, count }
    }

    /// Device-relative slot of `core`, if it participates.
    pub const fn slot(&self, core: CoreId) -> Option<usize> {
        let idx = core.as_index();
        if idx >= self.first && idx - self.first < self.count {
            Some(idx - self.first)
        } else {
            None
        }
    }

    pub fn check(&self, device: Device, core: CoreId) -> Result<usize> {
        self.slot(core).ok_or(PlatformError::Context {
            device,
            index: core.as_index(),
            limit: self.first + self.count,
        })
    }
}

/// Shared inter-core notification device (ACLINT MSWI / CLINT MSIP block).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotifierHandle {
    pub base: usize,
    pub size: usize,
    pub cores: CoreRange,
}

impl NotifierHandle {
    pub const fn new(base: usize, size: usize, cores: CoreRange) -> Self {
        Self { base, size, cores }
    }
}

/// Shared timer device (ACLINT MTIMER / CLINT mtime + mtimecmp).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    /// Counter frequency in Hz.
    pub frequency: u64,
    pub mtime_addr: usize,
    pub mtime_size: usize,
    pub mtimecmp_addr: usize,
    pub mtimecmp_size: usize,
    pub cores: CoreRange,
    pub has_64bit_mmio: bool,
}

/// Interrupt router driver contract.
pub trait IrqRouterDriver: Sync {
    /// Resets priorities, enables and thresholds of every context to the baseline.
    fn cold_init(&self, handle: &RouterHandle) -> Result<()>;
    /// Prepares one core's context pair.
    fn warm_init(&self, handle: &RouterHandle, context: InterruptContext) -> Result<()>;
    fn set_enable(&self, handle: &RouterHandle, context: usize, word: usize, enabled: bool);
    fn set_threshold(&self, handle: &RouterHandle, context: usize, value: u32);
    fn set_priority(&self, handle: &RouterHandle, source: u32, priority: u32);
    fn threshold(&self, handle: &RouterHandle, context: usize) -> u32;
    fn enable_word(&self, handle: &RouterHandle, context: usize, word: usize) -> u32;
}

/// Inter-core notification driver contract.
pub trait NotifierDriver: Sync {
    fn cold_init(&self, handle: &NotifierHandle) -> Result<()>;
    fn warm_init(&self, handle: &NotifierHandle, core: CoreId) -> Result<()>;
    fn send(&self, handle: &NotifierHandle, core: CoreId);
    fn clear(&self, handle: &NotifierHandle, core: CoreId);
    fn pending(&self, handle: &NotifierHandle, core: CoreId) -> bool;
}

/// Per-core timer driver contract.
pub trait TimerDriver: Sync {
    fn cold_init(&self, handle: &TimerHandle) -> Result<()>;
    fn warm_init(&self, handle: &TimerHandle, core: CoreId) -> Result<()>;
    fn now(&self, handle: &TimerHandle) -> u64;
    fn set_compare(&self, handle: &TimerHandle, core: CoreId, value: u64);
    fn compare(&self, handle: &TimerHandle, core: CoreId) -> u64;
}

/// Byte-oriented console driver contract.
pub trait ConsoleDriver: Sync {
    fn init(&self) -> Result<()>;
    fn put(&self, byte: u8);
    /// Returns [`None`] when no byte is available; never blocks.
    fn get(&self) -> Option<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_words_cover_every_source() {
        assert_eq!(RouterHandle::new(0xc00_0000, 0x400_0000, 3, 7, 1).enable_words(), 1);
        assert_eq!(RouterHandle::new(0xc00_0000, 0x400_0000, 32, 7, 1).enable_words(), 2);
        assert_eq!(RouterHandle::new(0xc00_0000, 0x400_0000, 31, 7, 1).enable_words(), 1);
    }

    #[test]
    fn router_handle_rejects_zero_sources() {
        let handle = RouterHandle::new(0xc00_0000, 0x400_0000, 0, 7, 1);
        assert!(matches!(handle.validate(), Err(PlatformError::Config { .. })));
    }

    #[test]
    fn core_range_maps_relative_slots() {
        let range = CoreRange::new(2, 2);
        assert_eq!(range.slot(CoreId::from_raw(1)), None);
        assert_eq!(range.slot(CoreId::from_raw(2)), Some(0));
        assert_eq!(range.slot(CoreId::from_raw(3)), Some(1));
        assert_eq!(
            range.check(Device::Timer, CoreId::from_raw(4)),
            Err(PlatformError::Context { device: Device::Timer, index: 4, limit: 4 })
        );
    }
}
