// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: System reset controllers and their registration slot
//! OWNERS: @firmware-team
//! PUBLIC API: ResetController, ResetSlot, system_reset(), HtifExit
//! DEPENDS_ON: halt::park_forever, drivers::htif
//! INVARIANTS: perform() never returns; at most one controller registered per boot cycle

use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::htif::Htif;
use crate::error::{Device, PlatformError, Result};
use crate::halt::park_forever;
use crate::mmio::Mmio;
use crate::types::ResetRequest;

/// A mechanism able to reset or power off the machine.
pub trait ResetController: Sync {
    /// Pure predicate; must not touch hardware.
    fn can_handle(&self, request: ResetRequest) -> bool;
    /// Performs the reset. When the mechanism turns out to be unavailable the
    /// core is parked instead of returning.
    fn perform(&self, request: ResetRequest) -> !;
}

/// A variant's reset controller, usable once the cold core's early init
/// registered it.
pub struct ResetSlot<C> {
    controller: C,
    registered: AtomicBool,
}

impl<C: ResetController> ResetSlot<C> {
    pub const fn new(controller: C) -> Self {
        Self { controller, registered: AtomicBool::new(false) }
    }

    pub fn register(&self) -> Result<()> {
        if self.registered.swap(true, Ordering::AcqRel) {
            log::error!(target: "reset", "controller already registered");
            return Err(PlatformError::ColdReentry { device: Device::Reset });
        }
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// The controller, if registered and willing to handle `request`.
    pub fn select(&self, request: ResetRequest) -> Option<&C> {
        if self.is_registered() && self.controller.can_handle(request) {
            Some(&self.controller)
        } else {
            None
        }
    }
}

/// Hands `request` to the registered controller. When there is none or it
/// declines, runs the variant's `fallback` halt and then parks the core with
/// `park`.
pub fn system_reset<C: ResetController>(
    slot: &ResetSlot<C>,
    request: ResetRequest,
    fallback: impl FnOnce(ResetRequest),
    park: fn(),
) -> ! {
    match slot.select(request) {
        Some(controller) => {
            log::info!(
                target: "reset",
                "type={} reason={}",
                request.kind.as_raw(),
                request.reason.as_raw()
            );
            controller.perform(request)
        }
        None => {
            log::warn!(target: "reset", "no controller for type={}; halting", request.kind.as_raw());
            fallback(request);
            park_forever(park)
        }
    }
}

/// Emulator reset: asks the host to end the simulation with exit code 0.
pub struct HtifExit<B> {
    htif: Htif<B>,
    park: fn(),
}

impl<B: Mmio> HtifExit<B> {
    pub const fn new(htif: Htif<B>, park: fn()) -> Self {
        Self { htif, park }
    }
}

impl<B: Mmio> ResetController for HtifExit<B> {
    fn can_handle(&self, _request: ResetRequest) -> bool {
        true
    }

    fn perform(&self, _request: ResetRequest) -> ! {
        self.htif.exit(0);
        // The host tears the simulation down asynchronously.
        park_forever(self.park)
    }
}
