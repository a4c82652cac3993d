// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Register-level access to memory-mapped devices.
//!
//! Drivers never dereference device addresses themselves; they go through an
//! [`Mmio`] implementation. Firmware images use [`Volatile`]; host tests use an
//! in-memory register file.

/// Minimal MMIO accessor keyed by absolute physical address.
pub trait Mmio: Sync {
    fn read8(&self, addr: usize) -> u8;
    fn write8(&self, addr: usize, value: u8);
    fn read32(&self, addr: usize) -> u32;
    fn write32(&self, addr: usize, value: u32);

    /// 64-bit read; the default splits it into two 32-bit accesses.
    fn read64(&self, addr: usize) -> u64 {
        let lo = self.read32(addr) as u64;
        let hi = self.read32(addr + 4) as u64;
        (hi << 32) | lo
    }

    /// 64-bit write; the default splits it into two 32-bit accesses.
    fn write64(&self, addr: usize, value: u64) {
        self.write32(addr, value as u32);
        self.write32(addr + 4, (value >> 32) as u32);
    }
}

impl<M: Mmio + ?Sized> Mmio for &M {
    fn read8(&self, addr: usize) -> u8 {
        (**self).read8(addr)
    }

    fn write8(&self, addr: usize, value: u8) {
        (**self).write8(addr, value)
    }

    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }

    fn read64(&self, addr: usize) -> u64 {
        (**self).read64(addr)
    }

    fn write64(&self, addr: usize, value: u64) {
        (**self).write64(addr, value)
    }
}

/// Volatile pointer access to the physical address space.
#[derive(Clone, Copy, Debug)]
pub struct Volatile {
    _private: (),
}

impl Volatile {
    /// # Safety
    ///
    /// Every address later handed to this accessor must be a mapped, suitably
    /// aligned device register of the running machine. Only firmware images
    /// executing in M-mode with physical addressing may construct one.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Mmio for Volatile {
    fn read8(&self, addr: usize) -> u8 {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    fn write8(&self, addr: usize, value: u8) {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
    }

    fn read32(&self, addr: usize) -> u32 {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    fn write32(&self, addr: usize, value: u32) {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    #[cfg(target_pointer_width = "64")]
    fn read64(&self, addr: usize) -> u64 {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::read_volatile(addr as *const u64) }
    }

    #[cfg(target_pointer_width = "64")]
    fn write64(&self, addr: usize, value: u64) {
        // SAFETY: address validity is the contract of `Volatile::new`.
        unsafe { core::ptr::write_volatile(addr as *mut u64, value) }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeBus;
    use super::Mmio;

    #[test]
    fn default_64bit_access_is_little_endian_pair() {
        let bus = FakeBus::new();
        bus.write64(0x100, 0x1122_3344_5566_7788);
        assert_eq!(bus.peek(0x100), 0x5566_7788);
        assert_eq!(bus.peek(0x104), 0x1122_3344);
        assert_eq!(bus.read64(0x100), 0x1122_3344_5566_7788);
    }

    #[test]
    fn borrowed_bus_forwards() {
        let bus = FakeBus::new();
        let by_ref = &bus;
        by_ref.write32(0x40, 7);
        assert_eq!(bus.read32(0x40), 7);
    }
}
