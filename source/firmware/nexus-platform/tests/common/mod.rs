// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared doubles for the integration tests: an in-memory register file and a
//! multi-core test board built from the real drivers and adapters.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use nexus_platform::adapters::{ConsoleAdapter, IrqRouterAdapter, NotifierAdapter, TimerAdapter};
use nexus_platform::drivers::aclint::{clint_notifier, clint_timer, Mswi, Mtimer};
use nexus_platform::drivers::plic::{Plic, MAX_PRIORITY, PLIC_SIZE};
use nexus_platform::drivers::{ConsoleDriver, CoreRange, RouterHandle};
use nexus_platform::halt::park_forever;
use nexus_platform::mmio::Mmio;
use nexus_platform::platform::{DEFAULT_CORE_STACK_SIZE, FIRMWARE_VERSION};
use nexus_platform::reset::{self, ResetController, ResetSlot};
use nexus_platform::types::{Features, Version};
use nexus_platform::{BootKind, Platform, PlatformInfo, ResetRequest, Result};

pub const PLIC_ADDR: usize = 0x0c00_0000;
pub const CLINT_ADDR: usize = 0x0200_0000;
pub const MTIME_ADDR: usize = CLINT_ADDR + 0xbff8;
pub const NUM_SOURCES: u32 = 40;

/// Sparse 32-bit register file; unwritten registers read as zero.
#[derive(Default)]
pub struct RegisterFile {
    regs: Mutex<BTreeMap<usize, u32>>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset64(&self, addr: usize, value: u64) {
        let mut regs = self.regs.lock().unwrap();
        regs.insert(addr, value as u32);
        regs.insert(addr + 4, (value >> 32) as u32);
    }

    pub fn peek(&self, addr: usize) -> u32 {
        self.regs.lock().unwrap().get(&addr).copied().unwrap_or(0)
    }
}

impl Mmio for RegisterFile {
    fn read8(&self, addr: usize) -> u8 {
        self.peek(addr) as u8
    }

    fn write8(&self, addr: usize, value: u8) {
        self.regs.lock().unwrap().insert(addr, value as u32);
    }

    fn read32(&self, addr: usize) -> u32 {
        self.peek(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        self.regs.lock().unwrap().insert(addr, value);
    }
}

/// Console whose transmitter is wired back into its receiver.
#[derive(Default)]
pub struct Loopback {
    fifo: Mutex<VecDeque<u8>>,
}

impl ConsoleDriver for Loopback {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn put(&self, byte: u8) {
        self.fifo.lock().unwrap().push_back(byte);
    }

    fn get(&self) -> Option<u8> {
        self.fifo.lock().unwrap().pop_front()
    }
}

/// Reset controller that records whether it was asked to act.
pub struct RecordingReset {
    accepts: bool,
    performed: Arc<AtomicBool>,
    park: fn(),
}

impl ResetController for RecordingReset {
    fn can_handle(&self, _request: ResetRequest) -> bool {
        self.accepts
    }

    fn perform(&self, _request: ResetRequest) -> ! {
        self.performed.store(true, Ordering::SeqCst);
        park_forever(self.park)
    }
}

/// Panicking park routine; lets a test observe a `-> !` path with
/// `catch_unwind`.
pub fn bail() {
    panic!("parked");
}

/// PLIC plus CLINT board with a configurable core count.
pub struct TestBoard<'a> {
    info: PlatformInfo,
    irqchip: IrqRouterAdapter<Plic<&'a RegisterFile>>,
    notifier: NotifierAdapter<Mswi<&'a RegisterFile>>,
    timer: TimerAdapter<Mtimer<&'a RegisterFile>>,
    console: ConsoleAdapter<Loopback>,
    pub reset: ResetSlot<RecordingReset>,
    pub performed: Arc<AtomicBool>,
    pub fell_back: AtomicBool,
    park: fn(),
}

impl<'a> TestBoard<'a> {
    pub fn new(bus: &'a RegisterFile, cores: usize) -> Self {
        Self::with_router(bus, cores, NUM_SOURCES)
    }

    /// A board whose router is described with `num_sources` sources; zero makes
    /// the router's cold path fail.
    pub fn with_router(bus: &'a RegisterFile, cores: usize, num_sources: u32) -> Self {
        Self::build(bus, cores, num_sources, true)
    }

    /// A board whose reset controller declines every request.
    pub fn with_selective_reset(bus: &'a RegisterFile, cores: usize) -> Self {
        Self::build(bus, cores, NUM_SOURCES, false)
    }

    fn build(bus: &'a RegisterFile, cores: usize, num_sources: u32, accepts: bool) -> Self {
        let range = CoreRange::new(0, cores);
        let performed = Arc::new(AtomicBool::new(false));
        Self {
            info: PlatformInfo {
                name: "TEST BOARD",
                firmware_version: FIRMWARE_VERSION,
                platform_version: Version::new(1, 0),
                features: Features::DEFAULT,
                core_count: cores,
                core_stack_size: DEFAULT_CORE_STACK_SIZE,
            },
            irqchip: IrqRouterAdapter::new(
                Plic::new(bus),
                RouterHandle::new(PLIC_ADDR, PLIC_SIZE, num_sources, MAX_PRIORITY, cores),
            ),
            notifier: NotifierAdapter::new(Mswi::new(bus), clint_notifier(CLINT_ADDR, range)),
            timer: TimerAdapter::new(Mtimer::new(bus), clint_timer(CLINT_ADDR, 1_000_000, range, true)),
            console: ConsoleAdapter::new(Loopback::default()),
            reset: ResetSlot::new(RecordingReset { accepts, performed: Arc::clone(&performed), park: bail }),
            performed,
            fell_back: AtomicBool::new(false),
            park: bail,
        }
    }
}

impl<'a> Platform for TestBoard<'a> {
    type Router = Plic<&'a RegisterFile>;
    type Notifier = Mswi<&'a RegisterFile>;
    type Timer = Mtimer<&'a RegisterFile>;
    type Console = Loopback;

    fn info(&self) -> &PlatformInfo {
        &self.info
    }

    fn irqchip(&self) -> &IrqRouterAdapter<Self::Router> {
        &self.irqchip
    }

    fn notifier(&self) -> &NotifierAdapter<Self::Notifier> {
        &self.notifier
    }

    fn timer(&self) -> &TimerAdapter<Self::Timer> {
        &self.timer
    }

    fn console(&self) -> &ConsoleAdapter<Self::Console> {
        &self.console
    }

    fn early_init(&self, kind: BootKind) -> Result<()> {
        if kind.is_cold() {
            self.reset.register()?;
        }
        Ok(())
    }

    fn system_reset(&self, request: ResetRequest) -> ! {
        let fell_back = &self.fell_back;
        reset::system_reset(&self.reset, request, |_| fell_back.store(true, Ordering::SeqCst), self.park)
    }
}
