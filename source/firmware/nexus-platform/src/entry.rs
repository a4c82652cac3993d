// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Firmware-image glue driving the selected variant on every core
//! OWNERS: @firmware-team
//! PUBLIC API: attach_device_tree(), platform_main(), platform_main_current()
//! DEPENDS_ON: variants::PLATFORM, boot, logging
//! INVARIANTS: First core in wins the cold path; a failed core never returns

use core::sync::atomic::AtomicBool;

use crate::boot::{claim_boot_kind, BootBarrier, BootConfig, BootSequence, BootStage};
use crate::devtree::DeviceTreeFixup;
use crate::halt::park_forever;
use crate::logging::{self, ConsoleLogger, PlatformConsole};
use crate::platform::Platform;
use crate::types::{BootKind, CoreId};
use crate::variants::{SelectedPlatform, PLATFORM};

static BARRIER: BootBarrier = BootBarrier::new();
static COLD_LOTTERY: AtomicBool = AtomicBool::new(false);
static LOGGER: ConsoleLogger = ConsoleLogger::new();
static CONSOLE: PlatformConsole<SelectedPlatform> = PlatformConsole(&PLATFORM);

/// Attaches the firmware's device-tree editor to the selected variant. Call
/// it on the cold core before [`platform_main`]; ARIANE uses it to strip the
/// debug-module node during its cold final init.
pub fn attach_device_tree(provider: &'static dyn DeviceTreeFixup) {
    PLATFORM.attach_device_tree(provider);
}

/// Brings the calling core up and returns how it booted. Parks the core
/// forever if any stage fails.
pub fn platform_main(core: CoreId) -> BootKind {
    let kind = claim_boot_kind(&COLD_LOTTERY);
    let mut sequence = BootSequence::new(&PLATFORM, &BARRIER, BootConfig::default(), core, kind);
    loop {
        match sequence.step() {
            Ok(BootStage::ConsoleInit) if kind.is_cold() => {
                if logging::init(&LOGGER, &CONSOLE).is_err() {
                    log::warn!(target: "boot", "logger already installed");
                }
            }
            Ok(BootStage::Operational) => return kind,
            Ok(_) => {}
            Err(_) => park_forever(crate::arch::wait_for_interrupt),
        }
    }
}

/// [`platform_main`] for the core reported by `mhartid`. A hart id that does
/// not fit a [`CoreId`] parks the core.
pub fn platform_main_current() -> BootKind {
    match crate::arch::current_hartid() {
        Some(core) => platform_main(core),
        None => {
            log::error!(target: "boot", "hart id outside the core id range; parking");
            park_forever(crate::arch::wait_for_interrupt)
        }
    }
}

#[cfg(feature = "panic_handler")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo<'_>) -> ! {
    // Bypass the logger lock; the panicking core may hold it.
    logging::emit(&CONSOLE, log::Level::Error, "panic", format_args!("{}", info));
    BARRIER.fail_cold();
    park_forever(crate::arch::wait_for_interrupt)
}
