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

//! Media session context
//!
//! A [`Session`] is the single context object for one emulation session. It
//! owns the two media slots, the active-title selector and the collaborators
//! (achievement engine, host, machine), and is passed to every coordinator
//! operation instead of living in process-wide statics.
//!
//! Operations are split across:
//! - `transaction`: two-phase media load (prepare → commit/abort)
//! - `reconciler`: active-title upkeep on eject and reset
//!
//! # Active title invariant
//!
//! When an active title is set, it refers to a slot holding media. Every
//! operation that clears a slot goes through the reconciler, which restores
//! the invariant.

mod reconciler;
mod transaction;

#[cfg(test)]
mod tests;

pub use transaction::StagedLoad;

use super::config::CoordinatorConfig;
use super::engine::{AchievementEngine, TitleId};
use super::error::{CoordinatorError, Result};
use super::host::{Host, HostEventBridge, OverlayTick, ACHIEVEMENT_MENU_LABEL};
use super::machine::{Machine, RunMode};
use super::media::{MediaKind, MediaRecord, MediaSlots};
use super::memory_bridge::MemoryBridge;
use serde::Serialize;
use std::time::Instant;

/// Marker for the load currently between prepare and commit
#[derive(Debug)]
struct Staging {
    ticket: u64,
    name: String,
}

/// Media coordinator session
///
/// # Example
/// ```
/// use oricra::core::headless::{HeadlessEngine, HeadlessHost, HeadlessMachine};
/// use oricra::core::{CoordinatorConfig, Session};
///
/// let mut session = Session::new(
///     HeadlessEngine::new(),
///     HeadlessHost::new(),
///     CoordinatorConfig::default(),
/// );
/// session.init_system();
/// session.init_ui(HeadlessMachine::new(64 * 1024));
/// // session.load_rom("games/xenon.dsk")?;
/// session.process_frame();
/// ```
pub struct Session<E, H, M> {
    /// Achievement engine
    engine: E,
    /// Host window
    host: H,
    /// Attached machine (absent until the UI is initialized)
    machine: Option<M>,
    /// Coordinator settings
    config: CoordinatorConfig,
    /// Tape and disk slots
    slots: MediaSlots,
    /// Slot that is the subject of achievement tracking
    active: Option<MediaKind>,
    /// Load between prepare and commit
    staging: Option<Staging>,
    /// Ticket handed to the next prepared load
    next_ticket: u64,
    /// Whether tapes may be swapped without a hardcore warning
    tape_hot_swap: bool,
    /// Menu, overlay and quit plumbing
    host_events: HostEventBridge,
    /// Whether the engine has been initialized
    initialized: bool,
}

impl<E: AchievementEngine, H: Host, M: Machine> Session<E, H, M> {
    /// Create a session with empty slots and no machine attached
    pub fn new(engine: E, host: H, config: CoordinatorConfig) -> Self {
        Self {
            engine,
            host,
            machine: None,
            config,
            slots: MediaSlots::new(),
            active: None,
            staging: None,
            next_ticket: 1,
            tape_hot_swap: true,
            host_events: HostEventBridge::new(),
            initialized: false,
        }
    }

    /// Initialize the achievement engine
    ///
    /// The engine is initialized and logged in only once per session; every
    /// call clears the memoized quit confirmation.
    pub fn init_system(&mut self) {
        if !self.initialized {
            log::info!(
                "Initializing achievements for {} {}",
                self.config.client_name,
                self.config.client_version
            );
            self.engine
                .init(&self.config.client_name, &self.config.client_version);
            if self.config.auto_login {
                self.engine.attempt_login(true);
            }
            self.initialized = true;
        }

        self.host_events.reset_quit_confirmation();
    }

    /// Attach a machine, rebuild the menu and register its memory
    ///
    /// # Returns
    ///
    /// The previously attached machine, if any
    pub fn init_ui(&mut self, machine: M) -> Option<M> {
        let previous = self.machine.replace(machine);
        self.rebuild_menu();
        self.init_memory();
        previous
    }

    /// Detach the machine
    ///
    /// The memory bridge reads zero until another machine is attached.
    pub fn detach_machine(&mut self) -> Option<M> {
        let machine = self.machine.take();
        self.engine.clear_memory_banks();
        machine
    }

    /// Replace the achievement menu in the host's menu bar
    pub fn rebuild_menu(&mut self) {
        let labels = self.host.menu_labels();
        if let Some(index) = labels.iter().position(|l| l == ACHIEVEMENT_MENU_LABEL) {
            self.host.remove_menu(index);
        }

        let menu = self.engine.create_popup_menu();
        self.host.append_menu(ACHIEVEMENT_MENU_LABEL, menu);
        self.host.redraw_menu_bar();
    }

    /// Re-register the machine's memory with the engine
    pub fn init_memory(&mut self) {
        self.engine.clear_memory_banks();
        if let Some(machine) = self.machine.as_ref() {
            self.engine.install_memory_bank(0, machine.memory_size());
        }
    }

    /// Run the engine's per-frame evaluation against emulated memory
    pub fn process_frame(&mut self) {
        let machine = self.machine.as_mut().map(|m| m as &mut dyn Machine);
        let mut bridge = MemoryBridge::new(machine);
        self.engine.do_achievements_frame(&mut bridge);
    }

    /// Dispatch a host menu command
    ///
    /// Returns false when the command is not an achievement command.
    pub fn handle_menu_command(&mut self, id: u32) -> bool {
        self.host_events.handle_menu_command(&mut self.engine, id)
    }

    /// Forward an overlay render tick using the current time
    pub fn render_overlay(&mut self) {
        self.render_overlay_at(Instant::now());
    }

    /// Forward an overlay render tick at `now`
    pub fn render_overlay_at(&mut self, now: Instant) {
        let paused = self
            .machine
            .as_ref()
            .is_some_and(|m| m.run_mode() == RunMode::Paused);

        let tick = OverlayTick {
            width: self.config.display_width,
            height: self.config.display_height,
            fullscreen: self.config.fullscreen,
            paused,
        };

        self.host_events
            .render_overlay(&mut self.engine, &self.host, tick, now);
    }

    /// Ask whether the application may quit (a confirmation is remembered)
    pub fn confirm_quit(&mut self) -> bool {
        self.host_events.confirm_quit(&mut self.engine)
    }

    /// Forget a remembered quit confirmation
    pub fn reset_quit_confirmation(&mut self) {
        self.host_events.reset_quit_confirmation();
    }

    /// Whether a title is the subject of achievement tracking
    pub fn game_is_active(&self) -> bool {
        self.active_title().is_some()
    }

    /// Pause emulation
    pub fn pause(&mut self) {
        if let Some(machine) = self.machine.as_mut() {
            machine.set_run_mode(RunMode::Paused);
        }
    }

    /// Resume emulation
    pub fn unpause(&mut self) {
        if let Some(machine) = self.machine.as_mut() {
            machine.set_run_mode(RunMode::Running);
        }
    }

    /// Soft reset the machine and reconcile the active title
    pub fn reset_emulation(&mut self) -> Result<()> {
        let machine = self.machine.as_mut().ok_or(CoordinatorError::NoMachine)?;
        machine.soft_reset();
        self.on_reset();
        Ok(())
    }

    /// Best guess at the running title's name
    ///
    /// The staged candidate's name while a load is in progress, otherwise
    /// the active title's name, otherwise empty.
    pub fn estimated_title(&self) -> &str {
        if let Some(staging) = self.staging.as_ref() {
            return &staging.name;
        }

        self.active_title().map_or("", MediaRecord::name)
    }

    /// Record in the slot for `kind`
    pub fn slot(&self, kind: MediaKind) -> &MediaRecord {
        self.slots.get(kind)
    }

    /// Both media slots
    pub fn slots(&self) -> &MediaSlots {
        &self.slots
    }

    /// Slot that is the subject of achievement tracking
    pub fn active_kind(&self) -> Option<MediaKind> {
        self.active
    }

    /// Record that is the subject of achievement tracking
    pub fn active_title(&self) -> Option<&MediaRecord> {
        self.active
            .map(|kind| self.slots.get(kind))
            .filter(|record| !record.is_empty())
    }

    /// Whether a prepared load awaits commit
    pub fn is_staging(&self) -> bool {
        self.staging.is_some()
    }

    /// Whether tapes may be swapped without a hardcore warning
    pub fn tape_hot_swapping(&self) -> bool {
        self.tape_hot_swap
    }

    /// Allow or forbid tape hot-swapping
    pub fn set_tape_hot_swapping(&mut self, enabled: bool) {
        log::debug!("Tape hot-swapping {}", if enabled { "enabled" } else { "disabled" });
        self.tape_hot_swap = enabled;
    }

    /// Whether the active-title selector refers to a slot holding media
    pub fn active_title_consistent(&self) -> bool {
        self.active
            .is_none_or(|kind| !self.slots.get(kind).is_empty())
    }

    /// Snapshot of the slots and modes
    pub fn status(&self) -> SessionStatus {
        let summary = |kind| {
            let record = self.slots.get(kind);
            (!record.is_empty()).then(|| MediaSummary {
                name: record.name().to_string(),
                title_id: record.title_id(),
                size: record.len(),
            })
        };

        SessionStatus {
            tape: summary(MediaKind::Tape),
            disk: summary(MediaKind::Disk),
            active: self.active,
            hardcore: self.engine.hardcore_mode_active(),
            tape_hot_swap: self.tape_hot_swap,
            staging: self.staging.is_some(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Achievement engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the achievement engine
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Host window system
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Attached machine, if any
    pub fn machine(&self) -> Option<&M> {
        self.machine.as_ref()
    }

    /// Mutable access to the attached machine
    pub fn machine_mut(&mut self) -> Option<&mut M> {
        self.machine.as_mut()
    }

    /// Make `kind` the active title and start tracking it
    fn activate_slot(&mut self, kind: MediaKind) {
        self.active = Some(kind);
        let record = self.slots.get(kind);
        log::info!(
            "Activating {} '{}' (title {})",
            kind,
            record.name(),
            record.title_id()
        );
        self.host.set_title(record.name());
        self.engine.activate_game(record.title_id());
    }
}

/// Summary of one occupied slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSummary {
    pub name: String,
    pub title_id: TitleId,
    pub size: usize,
}

/// Snapshot of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub tape: Option<MediaSummary>,
    pub disk: Option<MediaSummary>,
    pub active: Option<MediaKind>,
    pub hardcore: bool,
    pub tape_hot_swap: bool,
    pub staging: bool,
}
