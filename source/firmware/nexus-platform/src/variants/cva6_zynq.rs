// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CVA6 soft core on a Zynq UltraScale+ FPGA board.
//!
//! The console is the PS-side Cadence UART0, already configured by the
//! first-stage loader. The board has no controllable reset.

use crate::adapters::{ConsoleAdapter, IrqRouterAdapter, NotifierAdapter, TimerAdapter};
use crate::drivers::aclint::{clint_notifier, clint_timer, Mswi, Mtimer};
use crate::drivers::plic::{Plic, MAX_PRIORITY, PLIC_SIZE};
use crate::drivers::zynq_uart::ZynqUart;
use crate::drivers::{CoreRange, RouterHandle};
use crate::error::{Device, PlatformError};
use crate::halt::park_forever;
use crate::mmio::Mmio;
use crate::platform::{Platform, PlatformInfo, DEFAULT_CORE_STACK_SIZE, FIRMWARE_VERSION};
use crate::types::{Features, ResetRequest, Version};

pub mod config {
    pub const NAME: &str = "ESRG CVA6 FPGA";
    pub const PLIC_ADDR: usize = 0x0c00_0000;
    pub const PLIC_NUM_SOURCES: u32 = 2;
    pub const CORE_COUNT: usize = 1;
    pub const CLINT_ADDR: usize = 0x0200_0000;
    pub const CLINT_FREQ: u64 = 1_000_000;
    pub const UART0_ADDR: usize = 0xff00_0000;
}

pub const INFO: PlatformInfo = PlatformInfo {
    name: config::NAME,
    firmware_version: FIRMWARE_VERSION,
    platform_version: Version::new(0, 1),
    features: Features::DEFAULT,
    core_count: config::CORE_COUNT,
    core_stack_size: DEFAULT_CORE_STACK_SIZE,
};

pub struct Cva6Zynq<B> {
    irqchip: IrqRouterAdapter<Plic<B>>,
    notifier: NotifierAdapter<Mswi<B>>,
    timer: TimerAdapter<Mtimer<B>>,
    console: ConsoleAdapter<ZynqUart<B>>,
    park: fn(),
}

impl<B: Mmio + Copy> Cva6Zynq<B> {
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
                clint_timer(config::CLINT_ADDR, config::CLINT_FREQ, cores, true),
            ),
            console: ConsoleAdapter::new(ZynqUart::new(bus, config::UART0_ADDR)),
            park,
        }
    }
}

impl<B: Mmio> Platform for Cva6Zynq<B> {
    type Router = Plic<B>;
    type Notifier = Mswi<B>;
    type Timer = Mtimer<B>;
    type Console = ZynqUart<B>;

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

    fn console(&self) -> &ConsoleAdapter<ZynqUart<B>> {
        &self.console
    }

    fn system_reset(&self, request: ResetRequest) -> ! {
        let err = PlatformError::Unsupported { device: Device::Reset, what: "controllable reset" };
        log::warn!(target: "reset", "{} (type={}); halting", err, request.kind.as_raw());
        park_forever(self.park)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{boot_core, BootBarrier, BootConfig};
    use crate::devtree::DeviceTreeFixup;
    use crate::error::Result;
    use crate::mmio::fake::FakeBus;
    use crate::types::{BootKind, CoreId, ResetReason, ResetType};

    fn bail() {
        panic!("parked");
    }

    struct UntouchedTree;

    impl DeviceTreeFixup for UntouchedTree {
        fn apply_generic_fixups(&self) -> Result<()> {
            panic!("zynq has no device-tree fix-ups");
        }

        fn delete_compatible(&self, _compatible: &str) -> Result<bool> {
            panic!("zynq has no device-tree fix-ups");
        }
    }

    static TREE: UntouchedTree = UntouchedTree;

    #[test]
    fn attached_tree_is_ignored() {
        let bus = FakeBus::new();
        let zynq = Cva6Zynq::new(&bus, bail);
        zynq.attach_device_tree(&TREE);
        let barrier = BootBarrier::new();
        boot_core(&zynq, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();
    }

    #[test]
    fn boots_to_operational() {
        let bus = FakeBus::new();
        let zynq = Cva6Zynq::new(&bus, bail);
        let barrier = BootBarrier::new();
        boot_core(&zynq, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();
        assert_eq!(zynq.irqchip().threshold(1), Ok(MAX_PRIORITY));
        assert_eq!(zynq.irqchip().threshold(0), Ok(0));
    }

    #[test]
    fn console_round_trips_through_uart_fifo() {
        let bus = FakeBus::new();
        let zynq = Cva6Zynq::new(&bus, bail);
        zynq.console_init().unwrap();
        zynq.console_put(b'A');
        assert_eq!(zynq.console_get(), Some(b'A'));
    }

    #[test]
    fn reset_halts_without_touching_devices() {
        let bus = FakeBus::new();
        let zynq = Cva6Zynq::new(&bus, bail);
        let request = ResetRequest::new(ResetType::ColdReboot, ResetReason::NoReason);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| zynq.system_reset(request)));
        assert!(outcome.is_err());
        assert!(bus.writes_to(config::UART0_ADDR + 0x30).is_empty());
    }
}
