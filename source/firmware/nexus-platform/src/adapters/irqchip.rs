// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interrupt router adapter.
//!
//! Warm policy per core: every known source is enabled on both contexts, the
//! M-mode context admits everything (threshold 0) and the S-mode context
//! blocks everything (threshold at the router's maximum priority) until the
//! supervisor lowers it.

use crate::drivers::plic::THRESHOLD_ADMIT_ALL;
use crate::drivers::{IrqRouterDriver, RouterHandle};
use crate::error::{Device, Result};
use crate::sync::ColdGate;
use crate::types::{BootKind, CoreId, InterruptContext};

pub struct IrqRouterAdapter<D> {
    driver: D,
    handle: RouterHandle,
    gate: ColdGate,
}

impl<D: IrqRouterDriver> IrqRouterAdapter<D> {
    pub const fn new(driver: D, handle: RouterHandle) -> Self {
        Self { driver, handle, gate: ColdGate::new(Device::IrqRouter) }
    }

    pub fn init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        if kind.is_cold() {
            self.cold_init()?;
        }
        self.warm_init(core)
    }

    pub fn cold_init(&self) -> Result<()> {
        self.gate.run_cold(|| {
            self.handle.validate()?;
            self.driver.cold_init(&self.handle)
        })?;
        log::info!(
            target: "irqchip",
            "router @{:#x}: {} sources, {} contexts",
            self.handle.base,
            self.handle.num_sources,
            self.handle.context_count
        );
        Ok(())
    }

    pub fn warm_init(&self, core: CoreId) -> Result<()> {
        self.gate.ensure_ready()?;
        let ctx = InterruptContext::for_core(core);
        self.driver.warm_init(&self.handle, ctx)?;
        for word in 0..self.handle.enable_words() {
            self.driver.set_enable(&self.handle, ctx.machine, word, true);
            self.driver.set_enable(&self.handle, ctx.supervisor, word, true);
        }
        self.driver.set_threshold(&self.handle, ctx.machine, THRESHOLD_ADMIT_ALL);
        self.driver.set_threshold(&self.handle, ctx.supervisor, self.handle.max_priority);
        log::debug!(target: "irqchip", "core {} contexts m={} s={}", core, ctx.machine, ctx.supervisor);
        Ok(())
    }

    pub fn threshold(&self, context: usize) -> Result<u32> {
        self.handle.check_context(context)?;
        Ok(self.driver.threshold(&self.handle, context))
    }

    pub fn enable_word(&self, context: usize, word: usize) -> Result<u32> {
        self.handle.check_context(context)?;
        Ok(self.driver.enable_word(&self.handle, context, word))
    }
}
