// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Performance-monitoring event registration seam.

use crate::error::Result;

/// Registry of raw hardware events owned by the firmware's PMU layer.
pub trait PmuEventMap {
    /// Maps raw event selector `select` (under `select_mask`) to the counters
    /// set in `counter_map`.
    fn add_raw_event_counter_map(&mut self, select: u64, select_mask: u64, counter_map: u32)
        -> Result<()>;
}

/// First programmable counter usable for raw events (`mhpmcounter3`).
pub const FIRST_PROGRAMMABLE_COUNTER: u32 = 3;

/// Counter bitmap for the `index`-th programmable counter.
pub const fn programmable_counter(index: u32) -> u32 {
    1 << (index + FIRST_PROGRAMMABLE_COUNTER)
}
