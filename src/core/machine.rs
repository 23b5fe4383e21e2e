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

//! Emulation core interface
//!
//! The Oric emulation itself (CPU, peripherals, image parsing and booting)
//! sits behind the [`Machine`] trait. The coordinator only needs the memory
//! buffer, reset, run mode, drive selection and media insert/eject entry
//! points.

use super::error::Result;
use super::media::MediaKind;
use std::path::Path;

/// Emulation run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Running,
    Paused,
}

/// Disk controller fitted to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    None,
    Microdisc,
    Jasmin,
    Pravetz,
}

/// Image kind reported by the emulation core's detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    AtmosMicrodisc,
    AtmosJasmin,
    TelestratDisk,
    PravetzDisk,
    GuessMicrodisc,
    Tape,
    Unknown,
}

impl ImageKind {
    /// Slot the image belongs in, if any
    pub fn media_kind(self) -> Option<MediaKind> {
        match self {
            ImageKind::AtmosMicrodisc
            | ImageKind::AtmosJasmin
            | ImageKind::TelestratDisk
            | ImageKind::PravetzDisk
            | ImageKind::GuessMicrodisc => Some(MediaKind::Disk),
            ImageKind::Tape => Some(MediaKind::Tape),
            ImageKind::Unknown => None,
        }
    }
}

/// Emulation core contract
pub trait Machine {
    /// Emulated main memory
    fn memory(&self) -> &[u8];

    /// Emulated main memory (mutable)
    fn memory_mut(&mut self) -> &mut [u8];

    /// Addressable memory size in bytes
    fn memory_size(&self) -> usize {
        self.memory().len()
    }

    /// Soft reset the machine
    fn soft_reset(&mut self);

    /// Current run mode
    fn run_mode(&self) -> RunMode;

    /// Switch run mode
    fn set_run_mode(&mut self, mode: RunMode);

    /// Fitted disk controller
    fn drive_type(&self) -> DriveType;

    /// Detect the kind of image stored at `path`
    fn detect_image(&self, path: &Path) -> ImageKind;

    /// Insert a disk image into `drive`
    fn insert_disk(&mut self, path: &Path, drive: u8) -> Result<()>;

    /// Attach a tape image
    fn insert_tape(&mut self, path: &Path) -> Result<()>;

    /// Eject the disk in `drive`
    fn eject_disk(&mut self, drive: u8);

    /// Eject the tape
    fn eject_tape(&mut self);

    /// Issue the Pravetz boot sequence for the inserted disk
    fn boot_pravetz_disk(&mut self);

    /// Flag the Jasmin controller for reset on the next frame
    fn request_jasmin_reset(&mut self);

    /// Queue keystrokes to be typed into the machine
    fn queue_keys(&mut self, keys: &str);
}
