// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Device-tree fix-up seam.
//!
//! Parsing and editing the flattened device tree belongs to the firmware
//! layer above; variants only ask for fix-ups through [`DeviceTreeFixup`].

use spin::Once;

use crate::error::Result;

/// Compatible string of the RISC-V external debug module node.
pub const DEBUG_MODULE_COMPATIBLE: &str = "riscv,debug-013";

pub trait DeviceTreeFixup: Sync {
    /// Applies the generic fix-ups every image gets (memory reservations,
    /// disabled harts, ...).
    fn apply_generic_fixups(&self) -> Result<()>;
    /// Deletes the first node compatible with `compatible`; `Ok(false)` when
    /// there is none.
    fn delete_compatible(&self, compatible: &str) -> Result<bool>;
}

/// Fix-up provider attached by the firmware before bring-up starts.
pub struct FixupHook {
    provider: Once<&'static dyn DeviceTreeFixup>,
}

impl FixupHook {
    pub const fn new() -> Self {
        Self { provider: Once::new() }
    }

    /// Attaches `provider`; later calls keep the first provider.
    pub fn attach(&self, provider: &'static dyn DeviceTreeFixup) {
        self.provider.call_once(|| provider);
    }

    pub fn get(&self) -> Option<&'static dyn DeviceTreeFixup> {
        self.provider.get().copied()
    }
}

impl Default for FixupHook {
    fn default() -> Self {
        Self::new()
    }
}
