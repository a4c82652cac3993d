// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Per-variant platform descriptor contract
//! OWNERS: @firmware-team
//! PUBLIC API: Platform, PlatformInfo
//! DEPENDS_ON: adapters, devtree, reset, pmu
//! INVARIANTS: PlatformInfo immutable for the process lifetime; bring-up ops called only by boot
//!
//! A variant implements the four accessors and [`Platform::system_reset`];
//! the remaining operations default to delegating to the adapters, which is
//! what every variant does unless it has something extra to say.

use crate::adapters::{ConsoleAdapter, IrqRouterAdapter, NotifierAdapter, TimerAdapter};
use crate::devtree::DeviceTreeFixup;
use crate::drivers::{ConsoleDriver, IrqRouterDriver, NotifierDriver, TimerDriver};
use crate::error::{Device, PlatformError, Result};
use crate::pmu::PmuEventMap;
use crate::types::{BootKind, CoreId, Features, ResetRequest, Version, MAX_CORES};

/// Per-core stack size unless a variant overrides it.
pub const DEFAULT_CORE_STACK_SIZE: usize = 8192;

/// Version of this firmware layer reported alongside the platform's own.
pub const FIRMWARE_VERSION: Version = Version::new(0, 1);

/// Static facts about a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    pub name: &'static str,
    pub firmware_version: Version,
    pub platform_version: Version,
    pub features: Features,
    pub core_count: usize,
    pub core_stack_size: usize,
}

impl PlatformInfo {
    pub fn validate(&self) -> Result<()> {
        let device = Device::Platform;
        if self.name.is_empty() {
            return Err(PlatformError::Config { device, reason: "empty platform name" });
        }
        if self.core_count == 0 || self.core_count > MAX_CORES {
            return Err(PlatformError::Config { device, reason: "core count out of range" });
        }
        if self.core_stack_size == 0 || self.core_stack_size % 16 != 0 {
            return Err(PlatformError::Config { device, reason: "stack size not 16-byte aligned" });
        }
        Ok(())
    }

    pub fn contains(&self, core: CoreId) -> bool {
        core.as_index() < self.core_count
    }
}

pub trait Platform: Sync {
    type Router: IrqRouterDriver;
    type Notifier: NotifierDriver;
    type Timer: TimerDriver;
    type Console: ConsoleDriver;

    fn info(&self) -> &PlatformInfo;
    fn irqchip(&self) -> &IrqRouterAdapter<Self::Router>;
    fn notifier(&self) -> &NotifierAdapter<Self::Notifier>;
    fn timer(&self) -> &TimerAdapter<Self::Timer>;
    fn console(&self) -> &ConsoleAdapter<Self::Console>;

    /// Runs before any device bring-up. Registers the reset controller when
    /// `kind` is cold.
    fn early_init(&self, kind: BootKind) -> Result<()> {
        let _ = kind;
        Ok(())
    }

    /// Runs after device bring-up; cold-only global fix-ups go here.
    fn final_init(&self, kind: BootKind) -> Result<()> {
        let _ = kind;
        Ok(())
    }

    fn console_init(&self) -> Result<()> {
        self.console().init()
    }

    fn console_put(&self, byte: u8) {
        self.console().put(byte);
    }

    fn console_get(&self) -> Option<u8> {
        self.console().get()
    }

    fn irqchip_init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        self.irqchip().init(core, kind)
    }

    fn ipi_init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        self.notifier().init(core, kind)
    }

    fn timer_init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        self.timer().init(core, kind)
    }

    fn ipi_send(&self, target: CoreId) -> Result<()> {
        self.notifier().send(target)
    }

    fn ipi_clear(&self, core: CoreId) -> Result<()> {
        self.notifier().clear(core)
    }

    fn timer_value(&self) -> u64 {
        self.timer().now()
    }

    fn timer_event_start(&self, core: CoreId, deadline: u64) -> Result<()> {
        self.timer().set_deadline(core, deadline)
    }

    fn timer_event_stop(&self, core: CoreId) -> Result<()> {
        self.timer().cancel(core)
    }

    /// Registers the variant's raw hardware events.
    fn pmu_init(&self, map: &mut dyn PmuEventMap) -> Result<()> {
        let _ = map;
        Ok(())
    }

    /// Translates an event index to an `mhpmevent` value; 0 means "no mapping".
    fn pmu_xlate_to_mhpmevent(&self, event_idx: u32, data: u64) -> u64 {
        let _ = (event_idx, data);
        0
    }

    /// Hands the variant the device-tree editor its cold final init uses.
    /// Must be called before bring-up starts; variants without fix-ups
    /// ignore it.
    fn attach_device_tree(&self, provider: &'static dyn DeviceTreeFixup) {
        let _ = provider;
    }

    /// Resets or powers off the machine. Never returns.
    fn system_reset(&self, request: ResetRequest) -> !;
}
