// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Machine-mode RISC-V helpers.

use crate::types::CoreId;

/// Core of the executing hart, from `mhartid`. `None` when the hart id is
/// outside the core id range.
#[inline]
pub fn current_hartid() -> Option<CoreId> {
    #[cfg(target_arch = "riscv64")]
    {
        CoreId::from_hartid(::riscv::register::mhartid::read())
    }
    #[cfg(not(target_arch = "riscv64"))]
    {
        Some(CoreId::BOOT)
    }
}

/// Idles the core until the next interrupt (or a spurious wake-up).
#[inline]
pub fn wait_for_interrupt() {
    // SAFETY: `wfi` only stalls the hart; it has no memory effects.
    #[cfg(target_arch = "riscv64")]
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(target_arch = "riscv64"))]
    {
        core::hint::spin_loop();
    }
}

/// Full fence ordering device writes before a subsequent publication.
#[inline]
pub fn io_fence() {
    // SAFETY: a fence instruction only orders accesses.
    #[cfg(target_arch = "riscv64")]
    unsafe {
        core::arch::asm!("fence iorw, iorw", options(nostack, preserves_flags));
    }
    #[cfg(not(target_arch = "riscv64"))]
    {
        core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
    }
}
