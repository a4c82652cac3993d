// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Architecture specific support code
//! OWNERS: @firmware-team
//! PUBLIC API: current_hartid(), wait_for_interrupt()
//! DEPENDS_ON: per-ISA modules (riscv)
//! INVARIANTS: Host builds get inert stubs so bring-up logic stays testable

pub mod riscv;

pub use riscv::{current_hartid, wait_for_interrupt};
