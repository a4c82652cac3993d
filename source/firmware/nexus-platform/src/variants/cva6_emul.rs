// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CVA6 running under the cycle-accurate emulator.
//!
//! Console output and shutdown go through HTIF; there is no console input.

use crate::adapters::{ConsoleAdapter, IrqRouterAdapter, NotifierAdapter, TimerAdapter};
use crate::drivers::aclint::{clint_notifier, clint_timer, Mswi, Mtimer};
use crate::drivers::htif::{Htif, HtifWindow};
use crate::drivers::plic::{Plic, MAX_PRIORITY, PLIC_SIZE};
use crate::drivers::{CoreRange, RouterHandle};
use crate::error::Result;
use crate::mmio::Mmio;
use crate::platform::{Platform, PlatformInfo, DEFAULT_CORE_STACK_SIZE, FIRMWARE_VERSION};
use crate::reset::{system_reset, HtifExit, ResetSlot};
use crate::types::{BootKind, Features, ResetRequest, Version};

pub mod config {
    pub const NAME: &str = "ESRG CVA6 EMULATOR";
    pub const PLIC_ADDR: usize = 0x0c00_0000;
    pub const PLIC_NUM_SOURCES: u32 = 2;
    pub const CORE_COUNT: usize = 1;
    pub const CLINT_ADDR: usize = 0x0200_0000;
    pub const CLINT_FREQ: u64 = 1_000_000;
}

pub const INFO: PlatformInfo = PlatformInfo {
    name: config::NAME,
    firmware_version: FIRMWARE_VERSION,
    platform_version: Version::new(0, 1),
    features: Features::DEFAULT,
    core_count: config::CORE_COUNT,
    core_stack_size: DEFAULT_CORE_STACK_SIZE,
};

pub struct Cva6Emul<B> {
    irqchip: IrqRouterAdapter<Plic<B>>,
    notifier: NotifierAdapter<Mswi<B>>,
    timer: TimerAdapter<Mtimer<B>>,
    console: ConsoleAdapter<Htif<B>>,
    reset: ResetSlot<HtifExit<B>>,
    park: fn(),
}

impl<B: Mmio + Copy> Cva6Emul<B> {
    pub const fn new(bus: B, htif: fn() -> HtifWindow, park: fn()) -> Self {
        let cores = CoreRange::new(0, config::CORE_COUNT);
        Self {
            irqchip: IrqRouterAdapter::new(
                Plic::new(bus),
                RouterHandle::new(
                    config::PLIC_ADDR,
                    PLIC_SIZE,
                    config::PLIC_NUM_SOURCES,
                    MAX_PRIORITY,
                    config::CORE_COUNT,
                ),
            ),
            notifier: NotifierAdapter::new(Mswi::new(bus), clint_notifier(config::CLINT_ADDR, cores)),
            timer: TimerAdapter::new(
                Mtimer::new(bus),
                clint_timer(config::CLINT_ADDR, config::CLINT_FREQ, cores, true),
            ),
            console: ConsoleAdapter::new(Htif::new(bus, htif)),
            reset: ResetSlot::new(HtifExit::new(Htif::new(bus, htif), park)),
            park,
        }
    }
}

impl<B> Cva6Emul<B> {
    pub fn reset_slot(&self) -> &ResetSlot<HtifExit<B>> {
        &self.reset
    }
}

impl<B: Mmio> Platform for Cva6Emul<B> {
    type Router = Plic<B>;
    type Notifier = Mswi<B>;
    type Timer = Mtimer<B>;
    type Console = Htif<B>;

    fn info(&self) -> &PlatformInfo {
        &INFO
    }

    fn irqchip(&self) -> &IrqRouterAdapter<Plic<B>> {
        &self.irqchip
    }

    fn notifier(&self) -> &NotifierAdapter<Mswi<B>> {
        &self.notifier
    }

    fn timer(&self) -> &TimerAdapter<Mtimer<B>> {
        &self.timer
    }

    fn console(&self) -> &ConsoleAdapter<Htif<B>> {
        &self.console
    }

    fn early_init(&self, kind: BootKind) -> Result<()> {
        if kind.is_cold() {
            self.reset.register()?;
        }
        Ok(())
    }

    fn system_reset(&self, request: ResetRequest) -> ! {
        system_reset(&self.reset, request, |_| {}, self.park)
    }
}
