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

//! Two-phase media load
//!
//! Identifying a candidate requires reading the whole file, which can fail
//! or be rejected, before any slot is touched. Loading is therefore split:
//!
//! 1. [`Session::prepare`] reads and identifies the file, runs the hardcore
//!    swap check and returns an owned [`StagedLoad`]
//! 2. [`Session::commit`] consumes the staged load and installs it, or
//!    [`Session::abort`] discards it
//!
//! A failed prepare leaves every slot exactly as it was.

use super::{Session, Staging};
use crate::core::engine::AchievementEngine;
use crate::core::error::{CoordinatorError, Result};
use crate::core::host::Host;
use crate::core::machine::{DriveType, Machine};
use crate::core::media::{display_name, MediaKind, MediaRecord};
use std::path::Path;

/// Activity described to the user when a swap would leave hardcore mode
pub const SWAP_WARNING: &str =
    "load a new title without ejecting all images and hard-resetting the emulator";

/// Media load staged by [`Session::prepare`]
///
/// Only a successful prepare creates one, and commit or abort consumes it.
#[derive(Debug)]
#[must_use = "a staged load must be committed or aborted"]
pub struct StagedLoad {
    record: MediaRecord,
    should_activate: bool,
    ticket: u64,
}

impl StagedLoad {
    /// Candidate record
    pub fn record(&self) -> &MediaRecord {
        &self.record
    }

    /// Whether commit will activate the candidate's title
    pub fn should_activate(&self) -> bool {
        self.should_activate
    }
}

impl<E: AchievementEngine, H: Host, M: Machine> Session<E, H, M> {
    /// Stage a media file for loading
    ///
    /// Reads and identifies the file at `path`. When a different title is
    /// already active, hardcore mode may ask the user to confirm the swap.
    ///
    /// # Arguments
    ///
    /// * `path` - Candidate media file
    /// * `kind` - Slot the media is destined for
    ///
    /// # Returns
    ///
    /// - `Ok(StagedLoad)` to be passed to [`commit`](Session::commit)
    /// - `Err(CoordinatorError::Io)` if the file could not be read
    /// - `Err(CoordinatorError::UserDeclined)` if the user refused the swap
    pub fn prepare<P: AsRef<Path>>(&mut self, path: P, kind: MediaKind) -> Result<StagedLoad> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CoordinatorError::EmptyPath);
        }

        let data = std::fs::read(path).map_err(|source| CoordinatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(CoordinatorError::EmptyMedia(path.to_path_buf()));
        }

        let title_id = self.engine.identify(&data);
        let record = MediaRecord::new(kind, &display_name(path), data, title_id);

        log::debug!(
            "Prepared {} '{}': {} bytes, title {}",
            kind,
            record.name(),
            record.len(),
            title_id
        );

        if self.swap_needs_warning(&record)
            && self.engine.hardcore_mode_active()
            && !self.engine.warn_disable_hardcore(SWAP_WARNING)
        {
            log::warn!("Load of '{}' declined in hardcore mode", record.name());
            return Err(CoordinatorError::UserDeclined(record.name().to_string()));
        }

        let same_title = self
            .active_title()
            .is_some_and(|active| active.title_id() != 0 && active.title_id() == title_id);
        let should_activate = self.config.reload_on_same_title || !same_title;

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let staging = Staging {
            ticket,
            name: record.name().to_string(),
        };
        if let Some(previous) = self.staging.replace(staging) {
            log::warn!("Staged load '{}' superseded", previous.name);
        }

        Ok(StagedLoad {
            record,
            should_activate,
            ticket,
        })
    }

    /// Install a staged load
    ///
    /// Replaces the slot matching the record's kind, makes it the active
    /// title, updates the window title and activates the title unless the
    /// same title was already active.
    pub fn commit(&mut self, staged: StagedLoad) -> Result<()> {
        self.take_staging(staged.ticket, "commit")?;

        let StagedLoad {
            record,
            should_activate,
            ..
        } = staged;

        let kind = record.kind();
        let title_id = record.title_id();

        let previous = self.slots.install(record);
        if !previous.is_empty() {
            log::debug!("Released {} '{}' ({} bytes)", kind, previous.name(), previous.len());
        }
        drop(previous);

        self.active = Some(kind);
        let name = self.slots.get(kind).name();
        log::info!("Loaded {} '{}' (title {})", kind, name, title_id);
        self.host.set_title(name);

        if should_activate {
            self.engine.activate_game(title_id);
        }

        Ok(())
    }

    /// Discard a staged load
    pub fn abort(&mut self, staged: StagedLoad) -> Result<()> {
        self.take_staging(staged.ticket, "abort")?;
        log::warn!("Load of '{}' aborted", staged.record.name());
        Ok(())
    }

    /// Prepare, insert into the machine, then commit
    ///
    /// The staged load is aborted if the machine refuses the image.
    pub fn insert_media<P: AsRef<Path>>(&mut self, path: P, kind: MediaKind) -> Result<()> {
        let path = path.as_ref();
        if self.machine.is_none() {
            return Err(CoordinatorError::NoMachine);
        }

        let staged = self.prepare(path, kind)?;

        let inserted = match self.machine.as_mut() {
            Some(machine) => match kind {
                MediaKind::Tape => machine.insert_tape(path),
                MediaKind::Disk => machine.insert_disk(path, 0),
            },
            None => Err(CoordinatorError::NoMachine),
        };

        match inserted {
            Ok(()) => self.commit(staged),
            Err(e) => {
                log::error!("Failed to insert {}: {}", path.display(), e);
                self.abort(staged)?;
                Err(e)
            }
        }
    }

    /// Load a media image the way the emulator's own file loader does
    ///
    /// Detects the image kind, inserts it, then runs the boot sequence for
    /// the fitted disk controller, or types the tape load command.
    /// Unrecognized images are ignored.
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let image = self
            .machine
            .as_ref()
            .ok_or(CoordinatorError::NoMachine)?
            .detect_image(path);

        let Some(kind) = image.media_kind() else {
            log::warn!("Unrecognized image: {}", path.display());
            return Ok(());
        };

        self.insert_media(path, kind)?;

        let Some(machine) = self.machine.as_mut() else {
            return Ok(());
        };

        match kind {
            MediaKind::Disk => match machine.drive_type() {
                DriveType::Pravetz => machine.boot_pravetz_disk(),
                DriveType::Jasmin => machine.request_jasmin_reset(),
                DriveType::Microdisc | DriveType::None => {}
            },
            MediaKind::Tape => machine.queue_keys(&self.config.tape_autoload_command),
        }

        Ok(())
    }

    /// Whether swapping to `candidate` must pass the hardcore warning
    ///
    /// No warning when nothing is active, when the candidate is the active
    /// title in the same slot, or for an unrecognized tape while tape
    /// hot-swapping is allowed.
    fn swap_needs_warning(&self, candidate: &MediaRecord) -> bool {
        let Some(active) = self.active_title() else {
            return false;
        };

        if active.title_id() == candidate.title_id() && active.kind() == candidate.kind() {
            return false;
        }

        let hot_swap = candidate.kind() == MediaKind::Tape
            && candidate.title_id() == 0
            && self.tape_hot_swap;

        !hot_swap
    }

    /// Release the staging marker held by `ticket`
    fn take_staging(&mut self, ticket: u64, operation: &str) -> Result<Staging> {
        match self.staging.take() {
            Some(staging) if staging.ticket == ticket => Ok(staging),
            other => {
                self.staging = other;
                let message = format!("{} of a load that is no longer staged", operation);
                if cfg!(debug_assertions) {
                    panic!("Integrity violation: {}", message);
                }
                log::error!("Integrity violation: {}", message);
                Err(CoordinatorError::IntegrityViolation(message))
            }
        }
    }
}
