// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-core timer adapter.

use crate::drivers::aclint::COMPARE_PARKED;
use crate::drivers::{TimerDriver, TimerHandle};
use crate::error::{Device, Result};
use crate::sync::ColdGate;
use crate::types::{BootKind, CoreId};

pub struct TimerAdapter<D> {
    driver: D,
    handle: TimerHandle,
    gate: ColdGate,
}

impl<D: TimerDriver> TimerAdapter<D> {
    pub const fn new(driver: D, handle: TimerHandle) -> Self {
        Self { driver, handle, gate: ColdGate::new(Device::Timer) }
    }

    pub fn init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        if kind.is_cold() {
            self.cold_init()?;
        }
        self.warm_init(core)
    }

    pub fn cold_init(&self) -> Result<()> {
        self.gate.run_cold(|| self.driver.cold_init(&self.handle))?;
        log::info!(target: "timer", "mtime @{:#x}, {} Hz", self.handle.mtime_addr, self.handle.frequency);
        Ok(())
    }

    /// Arms the calling core's compare register in the parked state.
    pub fn warm_init(&self, core: CoreId) -> Result<()> {
        self.gate.ensure_ready()?;
        self.driver.warm_init(&self.handle, core)
    }

    /// Current value of the shared counter.
    pub fn now(&self) -> u64 {
        self.driver.now(&self.handle)
    }

    pub fn frequency(&self) -> u64 {
        self.handle.frequency
    }

    /// Programs `core` to fire once the counter reaches `deadline`.
    ///
    /// A deadline at or before [`now`](Self::now) is accepted and reported
    /// expired on the next check.
    pub fn set_deadline(&self, core: CoreId, deadline: u64) -> Result<()> {
        self.gate.ensure_ready()?;
        self.handle.cores.check(Device::Timer, core)?;
        self.driver.set_compare(&self.handle, core, deadline);
        Ok(())
    }

    pub fn cancel(&self, core: CoreId) -> Result<()> {
        self.set_deadline(core, COMPARE_PARKED)
    }

    pub fn expired(&self, core: CoreId) -> Result<bool> {
        self.gate.ensure_ready()?;
        self.handle.cores.check(Device::Timer, core)?;
        let compare = self.driver.compare(&self.handle, core);
        Ok(compare != COMPARE_PARKED && self.now() >= compare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::aclint::{clint_timer, Mtimer};
    use crate::drivers::CoreRange;
    use crate::error::PlatformError;
    use crate::mmio::fake::FakeBus;

    const CLINT: usize = 0x0200_0000;
    const MTIME: usize = CLINT + 0xbff8;

    fn adapter(bus: &FakeBus) -> TimerAdapter<Mtimer<&FakeBus>> {
        TimerAdapter::new(Mtimer::new(bus), clint_timer(CLINT, 1_000_000, CoreRange::new(0, 2), true))
    }

    #[test]
    fn frequency_comes_from_the_handle() {
        let bus = FakeBus::new();
        assert_eq!(adapter(&bus).frequency(), 1_000_000);
    }

    #[test]
    fn past_deadline_is_expired_immediately() {
        let bus = FakeBus::new();
        bus.preset64(MTIME, 5_000);
        let timer = adapter(&bus);
        timer.init(CoreId::BOOT, BootKind::Cold).unwrap();

        timer.set_deadline(CoreId::BOOT, 4_000).unwrap();
        assert_eq!(timer.expired(CoreId::BOOT), Ok(true));
    }

    #[test]
    fn future_deadline_fires_once_counter_catches_up() {
        let bus = FakeBus::new();
        bus.preset64(MTIME, 100);
        let timer = adapter(&bus);
        timer.init(CoreId::BOOT, BootKind::Cold).unwrap();

        timer.set_deadline(CoreId::BOOT, 200).unwrap();
        assert_eq!(timer.expired(CoreId::BOOT), Ok(false));
        bus.preset64(MTIME, 200);
        assert_eq!(timer.expired(CoreId::BOOT), Ok(true));
    }

    #[test]
    fn cancel_parks_compare() {
        let bus = FakeBus::new();
        bus.preset64(MTIME, 100);
        let timer = adapter(&bus);
        timer.init(CoreId::BOOT, BootKind::Cold).unwrap();
        timer.set_deadline(CoreId::BOOT, 50).unwrap();
        timer.cancel(CoreId::BOOT).unwrap();
        assert_eq!(timer.expired(CoreId::BOOT), Ok(false));
        assert_eq!(bus.peek64(CLINT + 0x4000), u64::MAX);
    }

    #[test]
    fn deadline_before_cold_is_pending() {
        let bus = FakeBus::new();
        let timer = adapter(&bus);
        assert_eq!(
            timer.set_deadline(CoreId::BOOT, 1),
            Err(PlatformError::ColdPending { device: Device::Timer })
        );
    }

    #[test]
    fn second_cold_is_rejected() {
        let bus = FakeBus::new();
        let timer = adapter(&bus);
        timer.init(CoreId::BOOT, BootKind::Cold).unwrap();
        assert_eq!(
            timer.init(CoreId::from_raw(1), BootKind::Cold),
            Err(PlatformError::ColdReentry { device: Device::Timer })
        );
    }
}
