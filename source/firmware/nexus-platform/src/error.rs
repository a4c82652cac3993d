// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bring-up error taxonomy.
//!
//! Every bring-up operation returns [`Result`]; the orchestrator treats any
//! error as fatal to the calling core. A variant that wants a step to be a
//! no-op returns `Ok(())` explicitly.

use core::fmt;

/// Shared device (or descriptor-level facility) an error originates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    IrqRouter,
    Notifier,
    Timer,
    Console,
    Reset,
    Pmu,
    Platform,
}

impl Device {
    pub const fn name(self) -> &'static str {
        match self {
            Device::IrqRouter => "irqchip",
            Device::Notifier => "ipi",
            Device::Timer => "timer",
            Device::Console => "console",
            Device::Reset => "reset",
            Device::Pmu => "pmu",
            Device::Platform => "platform",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced while bringing the platform up.
#[must_use = "bring-up errors are fatal to the booting core"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Invalid address, extent or parameter supplied to a cold path.
    #[error("{device}: invalid configuration: {reason}")]
    Config { device: Device, reason: &'static str },
    /// A computed per-core context or core index is out of range.
    #[error("{device}: index {index} out of range (limit {limit})")]
    Context { device: Device, index: usize, limit: usize },
    /// The device did not respond as the driver expected.
    #[error("{device}: device unresponsive")]
    DeviceUnresponsive { device: Device },
    /// The variant lacks the requested capability.
    #[error("{device}: unsupported operation: {what}")]
    Unsupported { device: Device, what: &'static str },
    /// A cold path was asked to run a second time in this boot cycle.
    #[error("{device}: cold path already invoked this boot cycle")]
    ColdReentry { device: Device },
    /// The device was used before its cold path completed.
    #[error("{device}: used before its cold path completed")]
    ColdPending { device: Device },
    /// The cold core aborted its bring-up; shared devices are unusable.
    #[error("{device}: cold bring-up aborted")]
    ColdAborted { device: Device },
    /// The addressed core has not joined the device yet.
    #[error("{device}: core {core} has not completed its warm path")]
    CoreOffline { device: Device, core: usize },
}

/// Coarse classification used by callers that only care about the blast radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Context,
    DeviceUnresponsive,
    Unsupported,
    /// Cold/warm ordering violation.
    Ordering,
}

impl PlatformError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::Config { .. } => ErrorKind::Config,
            PlatformError::Context { .. } => ErrorKind::Context,
            PlatformError::DeviceUnresponsive { .. } => ErrorKind::DeviceUnresponsive,
            PlatformError::Unsupported { .. } => ErrorKind::Unsupported,
            PlatformError::ColdReentry { .. }
            | PlatformError::ColdPending { .. }
            | PlatformError::ColdAborted { .. }
            | PlatformError::CoreOffline { .. } => ErrorKind::Ordering,
        }
    }

    pub const fn device(&self) -> Device {
        match *self {
            PlatformError::Config { device, .. }
            | PlatformError::Context { device, .. }
            | PlatformError::DeviceUnresponsive { device }
            | PlatformError::Unsupported { device, .. }
            | PlatformError::ColdReentry { device }
            | PlatformError::ColdPending { device }
            | PlatformError::ColdAborted { device }
            | PlatformError::CoreOffline { device, .. } => device,
        }
    }
}

pub type Result<T> = core::result::Result<T, PlatformError>;
