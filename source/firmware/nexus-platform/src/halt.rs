// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Terminal state for a core that cannot continue.

/// Parks the calling core forever, calling `park` on every iteration.
///
/// Firmware passes [`crate::arch::wait_for_interrupt`]; host tests pass a
/// function that panics so the diverging path can be observed.
pub fn park_forever(park: fn()) -> ! {
    loop {
        park();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static SPINS: AtomicUsize = AtomicUsize::new(0);

    fn count_then_bail() {
        if SPINS.fetch_add(1, Ordering::SeqCst) == 2 {
            panic!("parked");
        }
    }

    #[test]
    fn parking_never_returns_on_its_own() {
        let result = std::panic::catch_unwind(|| park_forever(count_then_bail));
        assert!(result.is_err());
        assert_eq!(SPINS.load(Ordering::SeqCst), 3);
    }
}
