// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! RISC-V platform-level interrupt controller.

use static_assertions::const_assert;

use super::{IrqRouterDriver, RouterHandle};
use crate::error::{Device, PlatformError, Result};
use crate::mmio::Mmio;
use crate::types::InterruptContext;

const PRIORITY_BASE: usize = 0x0;
const PRIORITY_STRIDE: usize = 0x4;
const ENABLE_BASE: usize = 0x2000;
const ENABLE_STRIDE: usize = 0x80;
const CONTEXT_BASE: usize = 0x20_0000;
const CONTEXT_STRIDE: usize = 0x1000;
const CONTEXT_THRESHOLD: usize = 0x0;

/// Sources are numbered 1..=1023; source 0 is reserved.
pub const MAX_SOURCES: u32 = 1023;
pub const MAX_PRIORITY: u32 = 7;
/// Priority every source gets on cold init.
pub const DEFAULT_PRIORITY: u32 = 1;
/// Threshold admitting every source with a non-zero priority.
pub const THRESHOLD_ADMIT_ALL: u32 = 0;

const_assert!(DEFAULT_PRIORITY > THRESHOLD_ADMIT_ALL);
const_assert!(DEFAULT_PRIORITY <= MAX_PRIORITY);

/// Canonical PLIC window size.
pub const PLIC_SIZE: usize = 0x400_0000;

/// PLIC driver over an MMIO bus.
#[derive(Clone, Copy)]
pub struct Plic<B> {
    bus: B,
}

impl<B: Mmio> Plic<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    fn priority_addr(handle: &RouterHandle, source: u32) -> usize {
        handle.base + PRIORITY_BASE + PRIORITY_STRIDE * source as usize
    }

    fn enable_addr(handle: &RouterHandle, context: usize, word: usize) -> usize {
        handle.base + ENABLE_BASE + ENABLE_STRIDE * context + 4 * word
    }

    fn threshold_addr(handle: &RouterHandle, context: usize) -> usize {
        handle.base + CONTEXT_BASE + CONTEXT_STRIDE * context + CONTEXT_THRESHOLD
    }

    fn check_layout(handle: &RouterHandle) -> Result<()> {
        let device = Device::IrqRouter;
        if handle.num_sources > MAX_SOURCES {
            return Err(PlatformError::Config { device, reason: "more than 1023 sources" });
        }
        if handle.base % CONTEXT_STRIDE != 0 {
            return Err(PlatformError::Config { device, reason: "base not 4 KiB aligned" });
        }
        if handle.max_priority == 0 || handle.max_priority > MAX_PRIORITY {
            return Err(PlatformError::Config { device, reason: "priority range unsupported" });
        }
        let needed = CONTEXT_BASE + CONTEXT_STRIDE * handle.context_count;
        if handle.size < needed {
            return Err(PlatformError::Config { device, reason: "extent smaller than context block" });
        }
        Ok(())
    }
}

impl<B: Mmio> IrqRouterDriver for Plic<B> {
    fn cold_init(&self, handle: &RouterHandle) -> Result<()> {
        Self::check_layout(handle)?;
        for source in 1..=handle.num_sources {
            self.set_priority(handle, source, DEFAULT_PRIORITY);
        }
        for context in 0..handle.context_count {
            for word in 0..handle.enable_words() {
                self.set_enable(handle, context, word, false);
            }
            self.set_threshold(handle, context, handle.max_priority);
        }
        Ok(())
    }

    fn warm_init(&self, handle: &RouterHandle, context: InterruptContext) -> Result<()> {
        handle.check_context(context.machine)?;
        handle.check_context(context.supervisor)?;
        for word in 0..handle.enable_words() {
            self.set_enable(handle, context.machine, word, false);
            self.set_enable(handle, context.supervisor, word, false);
        }
        Ok(())
    }

    fn set_enable(&self, handle: &RouterHandle, context: usize, word: usize, enabled: bool) {
        let value = if enabled { u32::MAX } else { 0 };
        self.bus.write32(Self::enable_addr(handle, context, word), value);
    }

    fn set_threshold(&self, handle: &RouterHandle, context: usize, value: u32) {
        self.bus.write32(Self::threshold_addr(handle, context), value);
    }

    fn set_priority(&self, handle: &RouterHandle, source: u32, priority: u32) {
        self.bus.write32(Self::priority_addr(handle, source), priority);
    }

    fn threshold(&self, handle: &RouterHandle, context: usize) -> u32 {
        self.bus.read32(Self::threshold_addr(handle, context))
    }

    fn enable_word(&self, handle: &RouterHandle, context: usize, word: usize) -> u32 {
        self.bus.read32(Self::enable_addr(handle, context, word))
    }
}
