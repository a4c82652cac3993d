// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Hardware variants and build-time selection of the linked one
//! OWNERS: @firmware-team
//! PUBLIC API: SelectedPlatform, PLATFORM, ariane, cva6_emul, cva6_zynq
//! DEPENDS_ON: cargo features `ariane`, `cva6-zynq`, `cva6-emul`
//! INVARIANTS: At most one PLATFORM per image; precedence ariane > cva6-zynq > cva6-emul

pub mod ariane;
pub mod cva6_emul;
pub mod cva6_zynq;

#[cfg(any(feature = "ariane", feature = "cva6-zynq", feature = "cva6-emul"))]
use crate::mmio::Volatile;

#[cfg(feature = "ariane")]
pub type SelectedPlatform = ariane::Ariane<Volatile>;

#[cfg(all(feature = "cva6-zynq", not(feature = "ariane")))]
pub type SelectedPlatform = cva6_zynq::Cva6Zynq<Volatile>;

#[cfg(all(feature = "cva6-emul", not(any(feature = "ariane", feature = "cva6-zynq"))))]
pub type SelectedPlatform = cva6_emul::Cva6Emul<Volatile>;

// SAFETY (all three): the variant's configured addresses are the register map
// of the machine this image is built for.

#[cfg(feature = "ariane")]
pub static PLATFORM: SelectedPlatform =
    SelectedPlatform::new(unsafe { Volatile::new() }, crate::arch::wait_for_interrupt);

#[cfg(all(feature = "cva6-zynq", not(feature = "ariane")))]
pub static PLATFORM: SelectedPlatform =
    SelectedPlatform::new(unsafe { Volatile::new() }, crate::arch::wait_for_interrupt);

#[cfg(all(feature = "cva6-emul", not(any(feature = "ariane", feature = "cva6-zynq"))))]
pub static PLATFORM: SelectedPlatform = SelectedPlatform::new(
    unsafe { Volatile::new() },
    crate::drivers::htif::linked_window,
    crate::arch::wait_for_interrupt,
);
