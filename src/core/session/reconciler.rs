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

//! Active title reconciliation
//!
//! Ejects and resets are the only points where a slot is cleared outside a
//! load, so they are where the active title is recomputed.

use super::Session;
use crate::core::engine::AchievementEngine;
use crate::core::host::Host;
use crate::core::machine::Machine;
use crate::core::media::MediaKind;

/// Drive the coordinator follows on the disk controller
const TRACKED_DRIVE: u8 = 0;

impl<E: AchievementEngine, H: Host, M: Machine> Session<E, H, M> {
    /// Eject media from the machine and reconcile the slot
    pub fn eject(&mut self, kind: MediaKind) {
        if let Some(machine) = self.machine.as_mut() {
            match kind {
                MediaKind::Tape => machine.eject_tape(),
                MediaKind::Disk => machine.eject_disk(TRACKED_DRIVE),
            }
        }

        self.on_slot_closed(kind);
    }

    /// Handle a slot being closed
    ///
    /// Clears the slot and, outside hardcore mode, falls back to the other
    /// slot's media. When nothing remains loaded and no load is staged, the
    /// window title and the engine are told that no media is loaded.
    pub fn on_slot_closed(&mut self, kind: MediaKind) {
        if self.active == Some(kind) {
            self.active = None;
        }

        let closed = self.slots.get(kind);
        if !closed.is_empty() {
            log::info!("Closed {} '{}'", kind, closed.name());
        }
        self.slots.clear(kind);

        let other = kind.other();
        if !self.slots.get(other).is_empty() && !self.engine.hardcore_mode_active() {
            self.activate_slot(other);
        }

        if self.slots.all_empty() && self.staging.is_none() {
            self.host.set_title("");
            self.engine.on_load_new_rom(&[]);
        }
    }

    /// Handle an emulation reset
    ///
    /// In hardcore mode only one slot may stay occupied: the slot that is not
    /// active is ejected (the disk when nothing is active). An idle session
    /// then activates whatever is loaded, preferring the tape. Tape
    /// hot-swapping is re-enabled and the engine is told about the reset.
    pub fn on_reset(&mut self) {
        if self.engine.hardcore_mode_active() && self.slots.all_occupied() {
            let evict = match self.active {
                Some(MediaKind::Tape) | None => MediaKind::Disk,
                Some(MediaKind::Disk) => MediaKind::Tape,
            };
            log::info!("Hardcore reset: ejecting {}", evict);
            self.eject(evict);
        }

        if self.active.is_none() {
            let loaded = [MediaKind::Tape, MediaKind::Disk]
                .into_iter()
                .find(|&kind| !self.slots.get(kind).is_empty());

            if let Some(kind) = loaded {
                self.activate_slot(kind);
            }
        }

        self.tape_hot_swap = true;
        self.engine.on_reset();
    }
}
