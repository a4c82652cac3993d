// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Inter-core notifier adapter.
//!
//! A core becomes reachable once its warm path ran; `send` to a core that has
//! not joined fails instead of raising a doorbell nobody is listening to.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::drivers::{NotifierDriver, NotifierHandle};
use crate::error::{Device, PlatformError, Result};
use crate::sync::ColdGate;
use crate::types::{BootKind, CoreId};

pub struct NotifierAdapter<D> {
    driver: D,
    handle: NotifierHandle,
    gate: ColdGate,
    joined: AtomicUsize,
}

impl<D: NotifierDriver> NotifierAdapter<D> {
    pub const fn new(driver: D, handle: NotifierHandle) -> Self {
        Self {
            driver,
            handle,
            gate: ColdGate::new(Device::Notifier),
            joined: AtomicUsize::new(0),
        }
    }

    pub fn init(&self, core: CoreId, kind: BootKind) -> Result<()> {
        if kind.is_cold() {
            self.cold_init()?;
        }
        self.warm_init(core)
    }

    pub fn cold_init(&self) -> Result<()> {
        self.gate.run_cold(|| {
            self.joined.store(0, Ordering::Release);
            self.driver.cold_init(&self.handle)
        })?;
        log::info!(
            target: "ipi",
            "notifier @{:#x}: cores {}..{}",
            self.handle.base,
            self.handle.cores.first,
            self.handle.cores.first + self.handle.cores.count
        );
        Ok(())
    }

    pub fn warm_init(&self, core: CoreId) -> Result<()> {
        self.gate.ensure_ready()?;
        let bit = self.join_bit(core)?;
        self.driver.warm_init(&self.handle, core)?;
        self.joined.fetch_or(bit, Ordering::AcqRel);
        log::debug!(target: "ipi", "core {} joined", core);
        Ok(())
    }

    /// Raises the notification flag of `target`.
    pub fn send(&self, target: CoreId) -> Result<()> {
        self.gate.ensure_ready()?;
        let bit = self.join_bit(target)?;
        if self.joined.load(Ordering::Acquire) & bit == 0 {
            return Err(PlatformError::CoreOffline {
                device: Device::Notifier,
                core: target.as_index(),
            });
        }
        self.driver.send(&self.handle, target);
        Ok(())
    }

    /// Acknowledges the notification pending on `core`.
    pub fn clear(&self, core: CoreId) -> Result<()> {
        self.gate.ensure_ready()?;
        self.handle.cores.check(Device::Notifier, core)?;
        self.driver.clear(&self.handle, core);
        Ok(())
    }

    pub fn pending(&self, core: CoreId) -> Result<bool> {
        self.gate.ensure_ready()?;
        self.handle.cores.check(Device::Notifier, core)?;
        Ok(self.driver.pending(&self.handle, core))
    }

    /// Bitmask of device slots whose warm path completed.
    pub fn joined_mask(&self) -> usize {
        self.joined.load(Ordering::Acquire)
    }

    fn join_bit(&self, core: CoreId) -> Result<usize> {
        let slot = self.handle.cores.check(Device::Notifier, core)?;
        if slot >= usize::BITS as usize {
            return Err(PlatformError::Context {
                device: Device::Notifier,
                index: core.as_index(),
                limit: self.handle.cores.first + usize::BITS as usize,
            });
        }
        Ok(1usize << slot)
    }
}
