// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! 16550/8250-compatible UART with configurable register stride and width.

use super::ConsoleDriver;
use crate::error::{Device, PlatformError, Result};
use crate::mmio::Mmio;

const RBR: usize = 0; // receive buffer (read)
const THR: usize = 0; // transmit holding (write)
const DLL: usize = 0; // divisor latch low (DLAB=1)
const IER: usize = 1;
const DLM: usize = 1; // divisor latch high (DLAB=1)
const FCR: usize = 2;
const LCR: usize = 3;
const MCR: usize = 4;
const LSR: usize = 5;
const SCR: usize = 7;

const LSR_DR: u8 = 0x01;
const LSR_THRE: u8 = 0x20;
const LCR_DLAB: u8 = 0x80;
const LCR_8N1: u8 = 0x03;
const FCR_FIFO_ENABLE: u8 = 0x01;

/// Static UART parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uart8250Config {
    pub base: usize,
    pub in_freq: u32,
    pub baudrate: u32,
    /// Registers sit at `base + (index << reg_shift)`.
    pub reg_shift: u32,
    /// Access width in bytes; 1 or 4.
    pub reg_width: u32,
}

/// 8250 UART driver.
#[derive(Clone, Copy)]
pub struct Uart8250<B> {
    bus: B,
    config: Uart8250Config,
}

impl<B: Mmio> Uart8250<B> {
    pub const fn new(bus: B, config: Uart8250Config) -> Self {
        Self { bus, config }
    }

    fn addr(&self, reg: usize) -> usize {
        self.config.base + (reg << self.config.reg_shift)
    }

    fn read(&self, reg: usize) -> u8 {
        let addr = self.addr(reg);
        match self.config.reg_width {
            4 => self.bus.read32(addr) as u8,
            _ => self.bus.read8(addr),
        }
    }

    fn write(&self, reg: usize, value: u8) {
        let addr = self.addr(reg);
        match self.config.reg_width {
            4 => self.bus.write32(addr, value as u32),
            _ => self.bus.write8(addr, value),
        }
    }

    /// Baud divisor for the configured clock, or `None` when it does not fit.
    pub fn divisor(&self) -> Option<u16> {
        let denom = self.config.baudrate.checked_mul(16)?;
        if denom == 0 {
            return None;
        }
        let div = self.config.in_freq / denom;
        if div == 0 {
            return None;
        }
        u16::try_from(div).ok()
    }
}

impl<B: Mmio> ConsoleDriver for Uart8250<B> {
    fn init(&self) -> Result<()> {
        let device = Device::Console;
        if self.config.base == 0 {
            return Err(PlatformError::Config { device, reason: "zero base address" });
        }
        if !matches!(self.config.reg_width, 1 | 4) {
            return Err(PlatformError::Config { device, reason: "register width not 1 or 4" });
        }
        let div = self
            .divisor()
            .ok_or(PlatformError::Config { device, reason: "baud divisor out of range" })?;

        self.write(IER, 0);
        self.write(LCR, LCR_DLAB);
        self.write(DLL, div as u8);
        self.write(DLM, (div >> 8) as u8);
        self.write(LCR, LCR_8N1);
        self.write(FCR, FCR_FIFO_ENABLE);
        self.write(MCR, 0);
        // Drain whatever the line status and receive buffer latched before reset.
        let _ = self.read(LSR);
        let _ = self.read(RBR);
        self.write(SCR, 0);
        Ok(())
    }

    fn put(&self, byte: u8) {
        while self.read(LSR) & LSR_THRE == 0 {
            core::hint::spin_loop();
        }
        self.write(THR, byte);
    }

    fn get(&self) -> Option<u8> {
        if self.read(LSR) & LSR_DR != 0 {
            Some(self.read(RBR))
        } else {
            None
        }
    }
}
