// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Memory reader/writer bridge
//!
//! Exposes the emulated machine's main memory to the achievement engine.
//! The bridge holds no state of its own: every access goes straight to the
//! attached machine, and accesses with no machine attached or outside the
//! addressable range are ignored (reads return 0).
//!
//! # Example
//!
//! ```
//! use oricra::core::headless::HeadlessMachine;
//! use oricra::core::memory_bridge::MemoryBridge;
//!
//! let mut machine = HeadlessMachine::new(16);
//! let mut bridge = MemoryBridge::new(Some(&mut machine));
//! bridge.write(3, 0x42);
//! assert_eq!(bridge.read(3), 0x42);
//! assert_eq!(bridge.read(16), 0);
//!
//! let detached = MemoryBridge::detached();
//! assert_eq!(detached.read(0), 0);
//! ```

use super::machine::Machine;

/// Memory bank exposed to the achievement engine
pub struct MemoryBridge<'a> {
    machine: Option<&'a mut dyn Machine>,
}

impl<'a> MemoryBridge<'a> {
    /// Create a bridge over an optional machine
    pub fn new(machine: Option<&'a mut dyn Machine>) -> Self {
        Self { machine }
    }

    /// Create a bridge with no machine attached
    pub fn detached() -> Self {
        Self { machine: None }
    }

    /// Addressable size (0 when detached)
    pub fn size(&self) -> usize {
        self.machine.as_ref().map_or(0, |m| m.memory_size())
    }

    /// Read one byte
    ///
    /// Returns 0 when detached or out of range.
    #[inline]
    pub fn read(&self, offset: usize) -> u8 {
        let Some(machine) = self.machine.as_ref() else {
            return 0;
        };

        if offset >= machine.memory_size() {
            log::trace!("Memory bridge read out of range: 0x{:04X}", offset);
            return 0;
        }

        machine.memory().get(offset).copied().unwrap_or(0)
    }

    /// Write one byte
    ///
    /// Ignored when detached or out of range.
    #[inline]
    pub fn write(&mut self, offset: usize, value: u8) {
        let Some(machine) = self.machine.as_mut() else {
            return;
        };

        if offset >= machine.memory_size() {
            log::trace!("Memory bridge write out of range: 0x{:04X}", offset);
            return;
        }

        if let Some(byte) = machine.memory_mut().get_mut(offset) {
            *byte = value;
        }
    }
}
