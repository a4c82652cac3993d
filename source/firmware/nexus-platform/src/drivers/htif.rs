// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-target interface used by RISC-V emulators.
//!
//! Requests are 64-bit words written to `tohost`:
//! `device << 56 | command << 48 | payload`. The host zeroes `tohost` once it
//! has consumed the request and may post a reply in `fromhost`.

use core::sync::atomic::AtomicU64;

use super::ConsoleDriver;
use crate::error::Result;
use crate::mmio::Mmio;

const DEV_SYSCALL: u64 = 0;
const DEV_CONSOLE: u64 = 1;
const CMD_CONSOLE_PUT: u64 = 1;

/// Location of the `tohost`/`fromhost` words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HtifWindow {
    pub tohost: usize,
    pub fromhost: usize,
}

// Emulators locate the mailbox through the ELF symbols `tohost`/`fromhost`.
#[cfg_attr(all(target_arch = "riscv64", target_os = "none"), export_name = "tohost")]
#[cfg_attr(all(target_arch = "riscv64", target_os = "none"), link_section = ".tohost")]
static TOHOST: AtomicU64 = AtomicU64::new(0);
#[cfg_attr(all(target_arch = "riscv64", target_os = "none"), export_name = "fromhost")]
#[cfg_attr(all(target_arch = "riscv64", target_os = "none"), link_section = ".tohost")]
static FROMHOST: AtomicU64 = AtomicU64::new(0);

/// Mailbox linked into this image.
pub fn linked_window() -> HtifWindow {
    HtifWindow { tohost: TOHOST.as_ptr() as usize, fromhost: FROMHOST.as_ptr() as usize }
}

/// Encodes one `tohost` request word.
pub const fn request(device: u64, command: u64, payload: u64) -> u64 {
    (device << 56) | (command << 48) | (payload & 0xffff_ffff_ffff)
}

/// Encodes an exit request carrying `code`.
pub const fn exit_request(code: u64) -> u64 {
    request(DEV_SYSCALL, 0, (code << 1) | 1)
}

/// HTIF channel. The window is resolved on each access since symbol
/// addresses are not available in `const` context.
#[derive(Clone, Copy)]
pub struct Htif<B> {
    bus: B,
    locate: fn() -> HtifWindow,
}

impl<B: Mmio> Htif<B> {
    pub const fn new(bus: B, locate: fn() -> HtifWindow) -> Self {
        Self { bus, locate }
    }

    /// Posts `word`, waiting for the host to drain any previous request.
    pub fn send(&self, word: u64) {
        let window = (self.locate)();
        while self.bus.read64(window.tohost) != 0 {
            // Acknowledge replies so the host can make progress.
            if self.bus.read64(window.fromhost) != 0 {
                self.bus.write64(window.fromhost, 0);
            }
            core::hint::spin_loop();
        }
        self.bus.write64(window.tohost, word);
    }

    /// Asks the host to terminate the simulation with `code`.
    pub fn exit(&self, code: u64) {
        self.send(exit_request(code));
    }
}

impl<B: Mmio> ConsoleDriver for Htif<B> {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn put(&self, byte: u8) {
        self.send(request(DEV_CONSOLE, CMD_CONSOLE_PUT, byte as u64));
    }

    /// The emulator never forwards host input.
    fn get(&self) -> Option<u8> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::fake::FakeBus;

    const TOHOST: usize = 0x8000_1000;
    const FROMHOST: usize = 0x8000_1040;

    fn window() -> HtifWindow {
        HtifWindow { tohost: TOHOST, fromhost: FROMHOST }
    }

    #[test]
    fn console_put_encodes_device_and_command() {
        let bus = FakeBus::new();
        let htif = Htif::new(&bus, window);
        htif.put(b'A');
        assert_eq!(bus.peek64(TOHOST), 0x0101_0000_0000_0041);
    }

    #[test]
    fn exit_code_zero_is_one() {
        assert_eq!(exit_request(0), 1);
        assert_eq!(exit_request(3), 7);
        let bus = FakeBus::new();
        Htif::new(&bus, window).exit(0);
        assert_eq!(bus.peek64(TOHOST), 1);
    }

    #[test]
    fn linked_window_is_distinct_and_aligned() {
        let window = linked_window();
        assert_ne!(window.tohost, window.fromhost);
        assert_eq!(window.tohost % 8, 0);
    }

    #[test]
    fn console_has_no_input() {
        let bus = FakeBus::new();
        let htif = Htif::new(&bus, window);
        assert_eq!(htif.get(), None);
    }
}
