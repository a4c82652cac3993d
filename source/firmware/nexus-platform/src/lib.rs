// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Platform bring-up layer for the machine-mode firmware runtime
//! OWNERS: @firmware-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests per module + tests/ (boot scenarios, reset, property tests)
//! PUBLIC API: Platform, boot::BootSequence, adapters::*, drivers::*, variants::PLATFORM
//! DEPENDS_ON: log (facade), spin, thiserror, bitflags
//! INVARIANTS: Cold path of every shared device runs exactly once and before any warm use
//!
//! Every hardware variant (board or emulator) implements [`Platform`] once.
//! The boot orchestrator in [`boot`] drives whichever variant was selected
//! through the same sequence on every core:
//!
//! ```text
//! EarlyInit -> ConsoleInit -> IrqchipInit -> IpiInit -> TimerInit -> FinalInit -> Operational
//! ```
//!
//! The first core to boot runs each device's cold path followed by its own
//! warm path; every other core runs only the warm path, after the cold core
//! has published completion.

#![cfg_attr(not(test), no_std)]
#![forbid(clippy::unwrap_used)]

pub mod adapters;
pub mod arch;
pub mod boot;
pub mod devtree;
pub mod drivers;
pub mod error;
pub mod halt;
pub mod logging;
pub mod mmio;
pub mod platform;
pub mod pmu;
pub mod reset;
pub mod sync;
pub mod types;
pub mod variants;

#[cfg(all(
    target_arch = "riscv64",
    target_os = "none",
    any(feature = "ariane", feature = "cva6-zynq", feature = "cva6-emul")
))]
pub mod entry;

pub use error::{PlatformError, Result};
pub use platform::{Platform, PlatformInfo};
pub use types::{BootKind, CoreId, InterruptContext, ResetReason, ResetRequest, ResetType};
