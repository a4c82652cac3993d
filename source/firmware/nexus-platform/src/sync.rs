// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Once-only cold path tracking for shared devices
//! OWNERS: @firmware-team
//! PUBLIC API: ColdGate::new(), run_cold(), ensure_ready()
//! DEPENDS_ON: core atomics
//! INVARIANTS: At most one cold invocation per device per boot cycle; a failed cold path is not retried

use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::{Device, PlatformError, Result};

const UNSTARTED: u8 = 0;
const RUNNING: u8 = 1;
const READY: u8 = 2;
const FAILED: u8 = 3;

/// Observable state of a device's cold path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColdState {
    Unstarted,
    Running,
    Ready,
    Failed,
}

/// Records whether a shared device's cold path ran, and how it ended.
pub struct ColdGate {
    device: Device,
    state: AtomicU8,
}

impl ColdGate {
    pub const fn new(device: Device) -> Self {
        Self { device, state: AtomicU8::new(UNSTARTED) }
    }

    /// Runs `init` as the device's single cold path.
    ///
    /// A second call fails with [`PlatformError::ColdReentry`] whatever the
    /// outcome of the first one was.
    pub fn run_cold(&self, init: impl FnOnce() -> Result<()>) -> Result<()> {
        if self
            .state
            .compare_exchange(UNSTARTED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::error!(target: self.device.name(), "cold path re-entered");
            return Err(PlatformError::ColdReentry { device: self.device });
        }
        match init() {
            Ok(()) => {
                self.state.store(READY, Ordering::Release);
                Ok(())
            }
            Err(err) => {
                self.state.store(FAILED, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Fails unless the cold path completed successfully.
    pub fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            ColdState::Ready => Ok(()),
            ColdState::Failed => Err(PlatformError::ColdAborted { device: self.device }),
            ColdState::Unstarted | ColdState::Running => {
                Err(PlatformError::ColdPending { device: self.device })
            }
        }
    }

    pub fn state(&self) -> ColdState {
        match self.state.load(Ordering::Acquire) {
            UNSTARTED => ColdState::Unstarted,
            RUNNING => ColdState::Running,
            READY => ColdState::Ready,
            _ => ColdState::Failed,
        }
    }
}
