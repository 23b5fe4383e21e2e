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

//! Media records and slots
//!
//! The coordinator tracks exactly two media attachment points, one tape deck
//! and one disk drive. Each slot holds a [`MediaRecord`] that owns the raw
//! file contents of the attached image along with its display name and the
//! title identifier reported by the achievement engine.
//!
//! A record with zero length is empty. Clearing a record resets every field
//! together, so there are no partially empty states.

use super::engine::TitleId;
use serde::Serialize;
use std::path::Path;


/// Maximum display name size in bytes, including the terminator slot
/// reserved by the achievement engine's title buffer
pub const DISPLAY_NAME_CAPACITY: usize = 64;

/// Media kind
///
/// The set of kinds is closed: an Oric has one tape deck and one disk drive
/// that the coordinator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Cassette tape image
    Tape,
    /// Floppy disk image
    Disk,
}

impl MediaKind {
    /// The other slot's kind
    pub fn other(self) -> Self {
        match self {
            MediaKind::Tape => MediaKind::Disk,
            MediaKind::Disk => MediaKind::Tape,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Tape => write!(f, "tape"),
            MediaKind::Disk => write!(f, "disk"),
        }
    }
}

/// Identity and contents of one loaded media item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Raw file contents (empty = no media)
    data: Vec<u8>,

    /// Display name derived from the file's base name
    name: String,

    /// Title identifier (0 = unrecognized)
    title_id: TitleId,

    /// Slot kind this record belongs to
    kind: MediaKind,
}

impl MediaRecord {
    /// Create an empty record for the given slot kind
    pub fn empty(kind: MediaKind) -> Self {
        Self {
            data: Vec::new(),
            name: String::new(),
            title_id: 0,
            kind,
        }
    }

    /// Create a record from loaded file contents
    ///
    /// The name is truncated to fit [`DISPLAY_NAME_CAPACITY`].
    pub fn new(kind: MediaKind, name: &str, data: Vec<u8>, title_id: TitleId) -> Self {
        Self {
            data,
            name: truncate_display_name(name).to_string(),
            title_id,
            kind,
        }
    }

    /// Raw file contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte length of the contents (0 = no media)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this record holds no media
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Title identifier (0 = unrecognized)
    pub fn title_id(&self) -> TitleId {
        self.title_id
    }

    /// Slot kind
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Release the buffer and reset every field
    pub fn clear(&mut self) {
        *self = Self::empty(self.kind);
    }
}

/// The two fixed media slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSlots {
    tape: MediaRecord,
    disk: MediaRecord,
}

impl MediaSlots {
    /// Create both slots empty
    pub fn new() -> Self {
        Self {
            tape: MediaRecord::empty(MediaKind::Tape),
            disk: MediaRecord::empty(MediaKind::Disk),
        }
    }

    /// Record in the slot for `kind`
    pub fn get(&self, kind: MediaKind) -> &MediaRecord {
        match kind {
            MediaKind::Tape => &self.tape,
            MediaKind::Disk => &self.disk,
        }
    }

    /// Install a record into its slot, returning the previous occupant
    ///
    /// The record's kind selects the slot.
    pub fn install(&mut self, record: MediaRecord) -> MediaRecord {
        let slot = self.slot_mut(record.kind());
        std::mem::replace(slot, record)
    }

    /// Clear the slot for `kind`
    pub fn clear(&mut self, kind: MediaKind) {
        self.slot_mut(kind).clear();
    }

    /// Whether both slots are empty
    pub fn all_empty(&self) -> bool {
        self.tape.is_empty() && self.disk.is_empty()
    }

    /// Whether both slots hold media
    pub fn all_occupied(&self) -> bool {
        !self.tape.is_empty() && !self.disk.is_empty()
    }

    fn slot_mut(&mut self, kind: MediaKind) -> &mut MediaRecord {
        match kind {
            MediaKind::Tape => &mut self.tape,
            MediaKind::Disk => &mut self.disk,
        }
    }
}

impl Default for MediaSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a display name from a file path
///
/// Uses the file's base name without extension, bounded to the display
/// name capacity.
///
/// # Example
///
/// ```
/// use oricra::core::media::display_name;
/// use std::path::Path;
///
/// assert_eq!(display_name(Path::new("tapes/Xenon-1.tap")), "Xenon-1");
/// ```
pub fn display_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    truncate_display_name(&stem).to_string()
}

/// Truncate a name to fit the display buffer, on a character boundary
pub fn truncate_display_name(name: &str) -> &str {
    let max = DISPLAY_NAME_CAPACITY - 1;
    if name.len() <= max {
        return name;
    }

    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
