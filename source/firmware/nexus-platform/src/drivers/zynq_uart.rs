// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cadence UART as found on Xilinx Zynq UltraScale+ boards.
//!
//! The first-stage loader leaves the UART configured; this driver only polls.

use super::ConsoleDriver;
use crate::error::Result;
use crate::mmio::Mmio;

const CHANNEL_STS: usize = 0x2c;
const TX_RX_FIFO: usize = 0x30;

const STS_RXEMPTY: u32 = 1 << 1;
const STS_TXFULL: u32 = 1 << 4;

#[derive(Clone, Copy)]
pub struct ZynqUart<B> {
    bus: B,
    base: usize,
}

impl<B: Mmio> ZynqUart<B> {
    pub const fn new(bus: B, base: usize) -> Self {
        Self { bus, base }
    }

    fn status(&self) -> u32 {
        self.bus.read32(self.base + CHANNEL_STS)
    }
}

impl<B: Mmio> ConsoleDriver for ZynqUart<B> {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn put(&self, byte: u8) {
        while self.status() & STS_TXFULL != 0 {
            core::hint::spin_loop();
        }
        self.bus.write32(self.base + TX_RX_FIFO, byte as u32);
    }

    fn get(&self) -> Option<u8> {
        if self.status() & STS_RXEMPTY != 0 {
            return None;
        }
        Some(self.bus.read32(self.base + TX_RX_FIFO) as u8)
    }
}
