// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Multi-core bring-up scenarios against the PLIC/CLINT test board
//! OWNERS: @firmware-team
//!
//! TEST_SCENARIOS:
//!   - single_core_boot_reaches_operational(): one core, console loop-back
//!   - warm_before_cold_is_rejected(): warm irqchip init before the cold path
//!   - warm_cores_wait_for_cold_core(): warm threads block until the barrier releases them
//!   - second_cold_boot_is_rejected(): the cold path runs once per boot cycle
//!   - failed_cold_path_aborts_warm_cores(): warm cores observe the abort
//!   - core_outside_platform_fails_alone(): no effect on other cores

mod common;

use std::thread;
use std::time::Duration;

use common::{RegisterFile, TestBoard, MTIME_ADDR};
use nexus_platform::boot::{boot_core, BootBarrier, BootConfig, BootStage};
use nexus_platform::drivers::plic::MAX_PRIORITY;
use nexus_platform::error::Device;
use nexus_platform::{BootKind, CoreId, InterruptContext, Platform, PlatformError};

fn core(raw: u16) -> CoreId {
    CoreId::from_raw(raw)
}

#[test]
fn single_core_boot_reaches_operational() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 1);
    let barrier = BootBarrier::new();

    boot_core(&board, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();

    assert!(barrier.is_released());
    assert_eq!(barrier.online_mask(), 0b1);
    assert!(board.console().is_ready());
    board.console_put(b'A');
    assert_eq!(board.console_get(), Some(b'A'));
    assert_eq!(board.console_get(), None);
}

#[test]
fn warm_before_cold_is_rejected() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 4);

    thread::scope(|s| {
        let early: Vec<_> = (1..4)
            .map(|raw| {
                let board = &board;
                s.spawn(move || board.irqchip_init(core(raw), BootKind::Warm))
            })
            .collect();
        for handle in early {
            assert_eq!(
                handle.join().unwrap(),
                Err(PlatformError::ColdPending { device: Device::IrqRouter })
            );
        }
    });

    // The rejected attempts left the cold path untouched.
    board.irqchip_init(CoreId::BOOT, BootKind::Cold).unwrap();
    for raw in 1..4 {
        board.irqchip_init(core(raw), BootKind::Warm).unwrap();
    }
}

#[test]
fn warm_cores_wait_for_cold_core() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 4);
    let barrier = BootBarrier::new();
    let config = BootConfig::default();

    thread::scope(|s| {
        let warm: Vec<_> = (1..4)
            .map(|raw| {
                let (board, barrier) = (&board, &barrier);
                s.spawn(move || boot_core(board, barrier, config, core(raw), BootKind::Warm))
            })
            .collect();
        // A slow cold core keeps the warm cores parked at the barrier.
        thread::sleep(Duration::from_millis(50));
        assert!(warm.iter().all(|handle| !handle.is_finished()));
        assert_eq!(barrier.online_mask(), 0);
        boot_core(&board, &barrier, config, CoreId::BOOT, BootKind::Cold).unwrap();
        for handle in warm {
            handle.join().unwrap().unwrap();
        }
    });

    assert_eq!(barrier.online_mask(), 0b1111);
    assert_eq!(board.notifier().joined_mask(), 0b1111);
    for raw in 0..4 {
        let ctx = InterruptContext::for_core(core(raw));
        assert_eq!(board.irqchip().threshold(ctx.machine), Ok(0));
        assert_eq!(board.irqchip().threshold(ctx.supervisor), Ok(MAX_PRIORITY));
        assert_eq!(board.irqchip().enable_word(ctx.machine, 0), Ok(u32::MAX));
        assert_eq!(board.irqchip().enable_word(ctx.supervisor, 1), Ok(u32::MAX));
    }
}

#[test]
fn notifications_reach_joined_cores() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 2);
    let barrier = BootBarrier::new();
    boot_core(&board, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();

    assert_eq!(
        board.ipi_send(core(1)),
        Err(PlatformError::CoreOffline { device: Device::Notifier, core: 1 })
    );

    boot_core(&board, &barrier, BootConfig::default(), core(1), BootKind::Warm).unwrap();
    board.ipi_send(core(1)).unwrap();
    assert_eq!(board.notifier().pending(core(1)), Ok(true));
    board.ipi_clear(core(1)).unwrap();
    assert_eq!(board.notifier().pending(core(1)), Ok(false));
}

#[test]
fn timer_deadline_fires_once_counter_passes() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 1);
    let barrier = BootBarrier::new();
    boot_core(&board, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();

    bus.preset64(MTIME_ADDR, 1_000);
    assert_eq!(board.timer_value(), 1_000);
    board.timer_event_start(CoreId::BOOT, 1_500).unwrap();
    assert_eq!(board.timer().expired(CoreId::BOOT), Ok(false));

    bus.preset64(MTIME_ADDR, 1_500);
    assert_eq!(board.timer().expired(CoreId::BOOT), Ok(true));

    board.timer_event_stop(CoreId::BOOT).unwrap();
    assert_eq!(board.timer().expired(CoreId::BOOT), Ok(false));
}

#[test]
fn second_cold_boot_is_rejected() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 2);
    let barrier = BootBarrier::new();
    boot_core(&board, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();

    let failure = boot_core(&board, &barrier, BootConfig::default(), core(1), BootKind::Cold).unwrap_err();
    assert_eq!(failure.stage, BootStage::EarlyInit);
    assert_eq!(failure.error, PlatformError::ColdReentry { device: Device::Reset });

    assert_eq!(
        board.irqchip().cold_init(),
        Err(PlatformError::ColdReentry { device: Device::IrqRouter })
    );
}

#[test]
fn failed_cold_path_aborts_warm_cores() {
    let bus = RegisterFile::new();
    let board = TestBoard::with_router(&bus, 2, 0);
    let barrier = BootBarrier::new();
    let config = BootConfig::default();

    let cold = boot_core(&board, &barrier, config, CoreId::BOOT, BootKind::Cold).unwrap_err();
    assert_eq!(cold.stage, BootStage::IrqchipInit);
    assert!(matches!(cold.error, PlatformError::Config { device: Device::IrqRouter, .. }));
    assert!(barrier.is_failed());

    let warm = boot_core(&board, &barrier, config, core(1), BootKind::Warm).unwrap_err();
    assert_eq!(warm.stage, BootStage::IrqchipInit);
    assert_eq!(warm.error, PlatformError::ColdAborted { device: Device::Platform });
    assert_eq!(barrier.online_mask(), 0);
}

#[test]
fn warm_core_gives_up_after_spin_budget() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 2);
    let barrier = BootBarrier::new();

    let failure =
        boot_core(&board, &barrier, BootConfig { cold_wait_spins: Some(16) }, core(1), BootKind::Warm).unwrap_err();
    assert_eq!(failure.error, PlatformError::ColdPending { device: Device::Platform });
    assert!(!barrier.is_failed());
}

#[test]
fn core_outside_platform_fails_alone() {
    let bus = RegisterFile::new();
    let board = TestBoard::new(&bus, 2);
    let barrier = BootBarrier::new();
    boot_core(&board, &barrier, BootConfig::default(), CoreId::BOOT, BootKind::Cold).unwrap();

    let failure = boot_core(&board, &barrier, BootConfig::default(), core(2), BootKind::Warm).unwrap_err();
    assert_eq!(failure.stage, BootStage::EarlyInit);
    assert_eq!(failure.error, PlatformError::Context { device: Device::Platform, index: 2, limit: 2 });

    boot_core(&board, &barrier, BootConfig::default(), core(1), BootKind::Warm).unwrap();
    assert_eq!(barrier.online_mask(), 0b11);
}
