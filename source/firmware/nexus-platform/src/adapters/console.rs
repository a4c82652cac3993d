// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Console adapter: byte output and non-blocking byte input.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::ConsoleDriver;
use crate::error::Result;

pub struct ConsoleAdapter<D> {
    driver: D,
    ready: AtomicBool,
}

impl<D: ConsoleDriver> ConsoleAdapter<D> {
    pub const fn new(driver: D) -> Self {
        Self { driver, ready: AtomicBool::new(false) }
    }

    pub fn init(&self) -> Result<()> {
        self.driver.init()?;
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn put(&self, byte: u8) {
        self.driver.put(byte);
    }

    pub fn get(&self) -> Option<u8> {
        self.driver.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Device, PlatformError};
    use spin::Mutex;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Loopback {
        fifo: Mutex<VecDeque<u8>>,
        broken: bool,
    }

    impl ConsoleDriver for Loopback {
        fn init(&self) -> Result<()> {
            if self.broken {
                return Err(PlatformError::DeviceUnresponsive { device: Device::Console });
            }
            Ok(())
        }

        fn put(&self, byte: u8) {
            self.fifo.lock().push_back(byte);
        }

        fn get(&self) -> Option<u8> {
            self.fifo.lock().pop_front()
        }
    }

    #[test]
    fn loopback_returns_written_byte() {
        let console = ConsoleAdapter::new(Loopback::default());
        console.init().unwrap();
        assert!(console.is_ready());
        console.put(b'A');
        assert_eq!(console.get(), Some(b'A'));
        assert_eq!(console.get(), None);
    }

    #[test]
    fn failed_init_leaves_console_not_ready() {
        let console = ConsoleAdapter::new(Loopback { broken: true, ..Loopback::default() });
        assert!(console.init().is_err());
        assert!(!console.is_ready());
    }
}
