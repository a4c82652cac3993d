// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Device adapters owning one handle and one driver each
//! OWNERS: @firmware-team
//! PUBLIC API: IrqRouterAdapter, NotifierAdapter, TimerAdapter, ConsoleAdapter
//! DEPENDS_ON: drivers (contracts), sync::ColdGate
//! INVARIANTS: cold path once per boot cycle; warm paths refuse to run before cold completed
//!
//! Adapters are `const`-constructible so a variant can live in a `static`.
//! `init(core, BootKind::Cold)` runs the device's cold path followed by the
//! calling core's warm path; `init(core, BootKind::Warm)` runs the warm path only.

pub mod console;
pub mod ipi;
pub mod irqchip;
pub mod timer;

pub use console::ConsoleAdapter;
pub use ipi::NotifierAdapter;
pub use irqchip::IrqRouterAdapter;
pub use timer::TimerAdapter;
