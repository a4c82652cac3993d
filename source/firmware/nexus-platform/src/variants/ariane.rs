// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: ARIANE (CVA6) FPGA SoC variant
//! OWNERS: @firmware-team
//! PUBLIC API: Ariane::new(), config
//! DEPENDS_ON: drivers::{plic, aclint, uart8250}, devtree, pmu
//! INVARIANTS: Device-tree fix-ups run on the cold core only; PMU registration stops at the first rejected event
//!
//! 8250 UART on a 4-byte register stride, PLIC with three sources and an
//! ACLINT MSWI/MTIMER pair laid out as a legacy CLINT. No controllable reset.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::adapters::{ConsoleAdapter, IrqRouterAdapter, NotifierAdapter, TimerAdapter};
use crate::devtree::{DeviceTreeFixup, FixupHook, DEBUG_MODULE_COMPATIBLE};
use crate::drivers::aclint::{clint_notifier, clint_timer, Mswi, Mtimer};
use crate::drivers::plic::{Plic, MAX_PRIORITY, PLIC_SIZE};
use crate::drivers::uart8250::{Uart8250, Uart8250Config};
use crate::drivers::{CoreRange, RouterHandle};
use crate::error::{Device, PlatformError, Result};
use crate::halt::park_forever;
use crate::mmio::Mmio;
use crate::platform::{Platform, PlatformInfo, DEFAULT_CORE_STACK_SIZE, FIRMWARE_VERSION};
use crate::pmu::{programmable_counter, PmuEventMap};
use crate::types::{BootKind, Features, ResetRequest, Version};

pub mod config {
    pub const NAME: &str = "ARIANE RISC-V";
    pub const UART_ADDR: usize = 0x1000_0000;
    pub const UART_FREQ: u32 = 50_000_000;
    pub const UART_BAUDRATE: u32 = 115_200;
    pub const UART_REG_SHIFT: u32 = 2;
    pub const UART_REG_WIDTH: u32 = 4;
    pub const PLIC_ADDR: usize = 0x0c00_0000;
    pub const PLIC_NUM_SOURCES: u32 = 3;
    pub const CORE_COUNT: usize = 1;
    pub const CLINT_ADDR: usize = 0x0200_0000;
    pub const MTIMER_FREQ: u64 = 1_000_000;
    /// Raw event selectors 0x1..=0xF, one programmable counter each.
    pub const PMU_RAW_EVENTS: u32 = 15;
    pub const PMU_SELECT_MASK: u64 = u64::MAX;
}

pub const INFO: PlatformInfo = PlatformInfo {
    name: config::NAME,
    firmware_version: FIRMWARE_VERSION,
    platform_version: Version::new(0, 1),
    features: Features::DEFAULT,
    core_count: config::CORE_COUNT,
    core_stack_size: DEFAULT_CORE_STACK_SIZE,
};

const UART: Uart8250Config = Uart8250Config {
    base: config::UART_ADDR,
    in_freq: config::UART_FREQ,
    baudrate: config::UART_BAUDRATE,
    reg_shift: config::UART_REG_SHIFT,
    reg_width: config::UART_REG_WIDTH,
};

pub struct Ariane<B> {
    irqchip: IrqRouterAdapter<Plic<B>>,
    notifier: NotifierAdapter<Mswi<B>>,
    timer: TimerAdapter<Mtimer<B>>,
    console: ConsoleAdapter<Uart8250<B>>,
    fixups: FixupHook,
    hw_events: AtomicU32,
    park: fn(),
}

impl<B: Mmio + Copy> Ariane<B> {
    pub const fn new(bus: B, park: fn()) -> Self {
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
                clint_timer(config::CLINT_ADDR, config::MTIMER_FREQ, cores, true),
            ),
            console: ConsoleAdapter::new(Uart8250::new(bus, UART)),
            fixups: FixupHook::new(),
            hw_events: AtomicU32::new(0),
            park,
        }
    }
}

impl<B> Ariane<B> {
    /// Raw hardware events registered by [`Platform::pmu_init`].
    pub fn hw_event_count(&self) -> u32 {
        self.hw_events.load(Ordering::Acquire)
    }
}

impl<B: Mmio> Platform for Ariane<B> {
    type Router = Plic<B>;
    type Notifier = Mswi<B>;
    type Timer = Mtimer<B>;
    type Console = Uart8250<B>;

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

    fn console(&self) -> &ConsoleAdapter<Uart8250<B>> {
        &self.console
    }

    fn attach_device_tree(&self, provider: &'static dyn DeviceTreeFixup) {
        self.fixups.attach(provider);
    }

    fn final_init(&self, kind: BootKind) -> Result<()> {
        if !kind.is_cold() {
            return Ok(());
        }
        let Some(fdt) = self.fixups.get() else {
            log::warn!(target: "platform", "no device tree attached; skipping fix-ups");
            return Ok(());
        };
        fdt.apply_generic_fixups()?;
        if fdt.delete_compatible(DEBUG_MODULE_COMPATIBLE)? {
            log::info!(target: "platform", "removed {} node", DEBUG_MODULE_COMPATIBLE);
        }
        Ok(())
    }

    fn pmu_init(&self, map: &mut dyn PmuEventMap) -> Result<()> {
        for index in 0..config::PMU_RAW_EVENTS {
            let select = u64::from(index) + 1;
            if let Err(err) =
                map.add_raw_event_counter_map(select, config::PMU_SELECT_MASK, programmable_counter(index))
            {
                log::error!(target: "pmu", "raw event {:#x}: {}", select, err);
                return Err(err);
            }
            self.hw_events.fetch_add(1, Ordering::AcqRel);
        }
        Ok(())
    }

    fn system_reset(&self, request: ResetRequest) -> ! {
        let err = PlatformError::Unsupported { device: Device::Reset, what: "controllable reset" };
        log::warn!(target: "reset", "{} (type={}); halting", err, request.kind.as_raw());
        park_forever(self.park)
    }
}
