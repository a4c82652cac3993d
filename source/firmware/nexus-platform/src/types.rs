// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Newtypes and tags carried through every bring-up call
//! OWNERS: @firmware-team
//! PUBLIC API: CoreId, BootKind, InterruptContext, Version, Features, ResetRequest
//! INVARIANTS: CoreId < core_count of the selected platform; contexts derived, never stored

use bitflags::bitflags;
use core::fmt;
use static_assertions::const_assert;

/// Upper bound on cores any variant may declare (online masks are one word).
pub const MAX_CORES: usize = 32;

const_assert!(MAX_CORES <= usize::BITS as usize);

/// Physical execution core identifier (the RISC-V hart id).
///
/// **Invariant**: assigned by hardware at reset and never changes afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CoreId(u16);

impl CoreId {
    /// Core 0; the usual (but not mandatory) cold-boot core.
    pub const BOOT: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Core for a hardware hart id; `None` when the id does not fit.
    #[inline]
    pub fn from_hartid(hartid: usize) -> Option<Self> {
        u16::try_from(hartid).ok().map(Self)
    }

    #[inline]
    pub const fn as_raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// Tag distinguishing the system-wide once-only path from the per-core path.
///
/// Exactly one core's sequence is tagged `Cold`; that core still runs the warm
/// path of every device right after the cold path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootKind {
    Cold,
    Warm,
}

impl BootKind {
    #[inline]
    pub const fn is_cold(self) -> bool {
        matches!(self, BootKind::Cold)
    }
}

impl fmt::Display for BootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootKind::Cold => f.write_str("cold"),
            BootKind::Warm => f.write_str("warm"),
        }
    }
}

/// Per-core pair of interrupt-router addressing contexts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterruptContext {
    pub machine: usize,
    pub supervisor: usize,
}

impl InterruptContext {
    /// Context `2c` for M-mode and `2c + 1` for S-mode.
    #[inline]
    pub const fn for_core(core: CoreId) -> Self {
        let base = 2 * core.as_index();
        Self { machine: base, supervisor: base + 1 }
    }
}

/// `major.minor` pair, encoded as `(major << 16) | minor` on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub const fn encode(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }

    pub const fn decode(raw: u32) -> Self {
        Self { major: (raw >> 16) as u16, minor: (raw & 0xffff) as u16 }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    /// Capabilities a variant advertises to the layers above it. Bit
    /// positions follow the SBI platform descriptor's feature word.
    pub struct Features: u32 {
        const TIMER_VALUE = 1 << 0;
        const HART_HOTPLUG = 1 << 1;
        const MFAULTS_DELEGATION = 1 << 2;
        const HART_SECONDARY_BOOT = 1 << 3;
    }
}

impl Features {
    /// Feature set shared by all variants unless they say otherwise.
    pub const DEFAULT: Self = Self::TIMER_VALUE.union(Self::MFAULTS_DELEGATION);
}

/// Kind of reset requested (SBI SRST numbering). Equality compares the raw
/// encoding, so `Other(0)` is the same request as `Shutdown`.
#[derive(Copy, Clone, Debug)]
pub enum ResetType {
    Shutdown,
    ColdReboot,
    WarmReboot,
    Other(u32),
}

impl ResetType {
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => ResetType::Shutdown,
            1 => ResetType::ColdReboot,
            2 => ResetType::WarmReboot,
            other => ResetType::Other(other),
        }
    }

    pub const fn as_raw(self) -> u32 {
        match self {
            ResetType::Shutdown => 0,
            ResetType::ColdReboot => 1,
            ResetType::WarmReboot => 2,
            ResetType::Other(raw) => raw,
        }
    }
}

impl PartialEq for ResetType {
    fn eq(&self, other: &Self) -> bool {
        self.as_raw() == other.as_raw()
    }
}

impl Eq for ResetType {}

/// Why the reset was requested (SBI SRST numbering). Compared by raw value,
/// like [`ResetType`].
#[derive(Copy, Clone, Debug)]
pub enum ResetReason {
    NoReason,
    SystemFailure,
    Other(u32),
}

impl ResetReason {
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => ResetReason::NoReason,
            1 => ResetReason::SystemFailure,
            other => ResetReason::Other(other),
        }
    }

    pub const fn as_raw(self) -> u32 {
        match self {
            ResetReason::NoReason => 0,
            ResetReason::SystemFailure => 1,
            ResetReason::Other(raw) => raw,
        }
    }
}

impl PartialEq for ResetReason {
    fn eq(&self, other: &Self) -> bool {
        self.as_raw() == other.as_raw()
    }
}

impl Eq for ResetReason {}

/// Transient reset request handed synchronously to a reset controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResetRequest {
    pub kind: ResetType,
    pub reason: ResetReason,
}

impl ResetRequest {
    /// Builds a request, folding `Other` values that name a standard
    /// type or reason into their named variant.
    pub const fn new(kind: ResetType, reason: ResetReason) -> Self {
        Self::from_raw(kind.as_raw(), reason.as_raw())
    }

    pub const fn from_raw(kind: u32, reason: u32) -> Self {
        Self { kind: ResetType::from_raw(kind), reason: ResetReason::from_raw(reason) }
    }
}
